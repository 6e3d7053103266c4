use std::fmt::{self, Display};

use crate::Tally;

enum Block {
    Fields(Vec<(String, String)>),
    Breakdown {
        heading: String,
        width: usize,
        rows: Vec<(String, usize)>,
    },
    List {
        heading: String,
        items: Vec<String>,
    },
}

/// Human-readable end-of-run report.
///
/// Rendered as a rule line, the title, then each block separated by a blank
/// line. Consecutive [`Summary::field`] calls share one aligned block.
pub struct Summary {
    title: String,
    rule: usize,
    blocks: Vec<Block>,
}

impl Summary {
    pub fn new(title: impl Into<String>, rule: usize) -> Self {
        Summary {
            title: title.into(),
            rule,
            blocks: Vec::new(),
        }
    }

    pub fn field(&mut self, label: impl Into<String>, value: impl Display) -> &mut Self {
        let entry = (label.into(), value.to_string());
        match self.blocks.last_mut() {
            Some(Block::Fields(fields)) => fields.push(entry),
            _ => self.blocks.push(Block::Fields(vec![entry])),
        }
        self
    }

    pub fn breakdown(
        &mut self,
        heading: impl Into<String>,
        width: usize,
        tally: &Tally,
    ) -> &mut Self {
        let rows = tally
            .sorted()
            .into_iter()
            .map(|(k, c)| (k.to_owned(), c))
            .collect();
        self.blocks.push(Block::Breakdown {
            heading: heading.into(),
            width,
            rows,
        });
        self
    }

    pub fn list<I, D>(&mut self, heading: impl Into<String>, items: I) -> &mut Self
    where
        I: IntoIterator<Item = D>,
        D: Display,
    {
        self.blocks.push(Block::List {
            heading: heading.into(),
            items: items.into_iter().map(|d| d.to_string()).collect(),
        });
        self
    }
}

impl Display for Summary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "{}", "=".repeat(self.rule))?;
        writeln!(f, "{}", self.title)?;
        for (i, block) in self.blocks.iter().enumerate() {
            if i > 0 {
                writeln!(f)?;
            }
            match block {
                Block::Fields(fields) => {
                    let width = fields
                        .iter()
                        .map(|(l, _)| l.chars().count())
                        .max()
                        .unwrap_or(0);
                    for (label, value) in fields {
                        writeln!(f, "  {label:<width$} : {value}")?;
                    }
                }
                Block::Breakdown {
                    heading,
                    width,
                    rows,
                } => {
                    let width = *width;
                    writeln!(f, "  {heading}:")?;
                    for (key, count) in rows {
                        writeln!(f, "    {key:<width$} {count}")?;
                    }
                }
                Block::List { heading, items } => {
                    writeln!(f, "{heading}:")?;
                    for item in items {
                        writeln!(f, "  {item}")?;
                    }
                }
            }
        }
        Ok(())
    }
}
