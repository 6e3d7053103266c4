use ahash::{HashMap, HashMapExt};

/// Occurrence counter that remembers first-seen key order.
#[derive(Debug, Default, Clone)]
pub struct Tally {
    index: HashMap<String, usize>,
    counts: Vec<(String, usize)>,
}

impl Tally {
    pub fn new() -> Self {
        Tally {
            index: HashMap::new(),
            counts: Vec::new(),
        }
    }

    pub fn add(&mut self, key: &str) {
        match self.index.get(key) {
            Some(&i) => self.counts[i].1 += 1,
            None => {
                self.index.insert(key.to_owned(), self.counts.len());
                self.counts.push((key.to_owned(), 1));
            }
        }
    }

    /// by descending count, ties in first-seen order
    pub fn sorted(&self) -> Vec<(&str, usize)> {
        let mut v: Vec<_> = self.counts.iter().map(|(k, c)| (k.as_str(), *c)).collect();
        v.sort_by(|a, b| b.1.cmp(&a.1));
        v
    }
}

impl<'a> FromIterator<&'a str> for Tally {
    fn from_iter<T: IntoIterator<Item = &'a str>>(iter: T) -> Self {
        let mut t = Tally::new();
        for key in iter {
            t.add(key);
        }
        t
    }
}
