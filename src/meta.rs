//! heuristic metadata of a result page
//!
//! Years inferred from file names read a leading `19xx`/`20xx` as a four
//! digit year, so `1989Nats.xls` is 1989 rather than 2019. Two digit
//! prefixes pivot at 30.

use log::trace;
use regex_lite::{Captures, Regex};
use scraper::{Html, Selector};

use crate::{config::Source, text::TextView, util::squash_ws};

/// body characters searched for a date or a `City, ST` location
pub const DATE_SCAN_CHARS: usize = 1200;
/// body characters searched for a source attribution
pub const SOURCE_SCAN_CHARS: usize = 3000;

const MONTHS: &str = "January|February|March|April|May|June|July|August|September|October|\
                      November|December|Jan|Feb|Mar|Apr|Jun|Jul|Aug|Sep|Oct|Nov|Dec";

#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct MeetDate {
    /// the matched text, or the inferred year
    pub raw: String,
    /// `YYYY-MM-DD`, `YYYY-MM` or `YYYY`
    pub start: String,
    /// `YYYY-MM-DD` for full dates, empty otherwise
    pub end: String,
}

impl MeetDate {
    pub fn year_only(year: String) -> Self {
        MeetDate {
            raw: year.clone(),
            start: year,
            end: String::new(),
        }
    }
}

#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct PageMeta {
    pub meet_name: String,
    pub date: MeetDate,
    pub location: String,
    pub source: String,
}

pub struct MetaRules {
    text: TextView,
    title_sel: Selector,
    h1_sel: Selector,
    range_reg: Regex,
    single_reg: Regex,
    month_year_reg: Regex,
    year_reg: Regex,
    date_phrase_reg: Regex,
    city_state_reg: Regex,
    sources: Vec<Source>,
}

impl MetaRules {
    pub fn new(sources: &[Source]) -> Self {
        Self {
            text: TextView::new(),
            title_sel: Selector::parse("title").unwrap(),
            h1_sel: Selector::parse("h1").unwrap(),
            range_reg: Regex::new(&format!(
                r"(?i)\b({MONTHS})\s+(\d{{1,2}})\s*[-–]\s*(\d{{1,2}}),\s*(\d{{4}})"
            ))
            .unwrap(),
            single_reg: Regex::new(&format!(r"(?i)\b({MONTHS})\s+(\d{{1,2}}),\s*(\d{{4}})"))
                .unwrap(),
            month_year_reg: Regex::new(&format!(r"(?i)\b({MONTHS})[,\s]+(\d{{4}})")).unwrap(),
            year_reg: Regex::new(r"\d{4}").unwrap(),
            date_phrase_reg: Regex::new(r"\b\w+ \d{1,2}\s*[-–]?\s*\d{0,2},?\s*\d{4}\b").unwrap(),
            city_state_reg: Regex::new(r"[A-Z][a-zA-Z\s]+,\s+[A-Z]{2}").unwrap(),
            sources: sources.to_vec(),
        }
    }

    pub fn text(&self) -> &TextView {
        &self.text
    }

    pub fn extract(&self, html: &Html, file_name: &str) -> PageMeta {
        let caption = self.text.caption_lines(html);
        let body = self.text.body_text(html, DATE_SCAN_CHARS);
        let texts = caption.iter().map(String::as_str).chain(std::iter::once(body.as_str()));
        let date = self
            .date(texts)
            .or_else(|| year_from_filename(file_name).map(MeetDate::year_only))
            .unwrap_or_default();
        let meta = PageMeta {
            meet_name: self.meet_name(html, &caption),
            date,
            location: self.location(&caption, &body),
            source: self.source(html).unwrap_or_default().to_owned(),
        };
        trace!("{file_name}: {meta:?}");
        meta
    }

    /// `<title>`, else first caption line, else first `<h1>`
    pub fn meet_name(&self, html: &Html, caption: &[String]) -> String {
        let title = html
            .select(&self.title_sel)
            .next()
            .map(|t| squash_ws(&t.text().collect::<String>()))
            .unwrap_or_default();
        if !title.is_empty() {
            return title;
        }
        if let Some(first) = caption.first() {
            return first.clone();
        }
        html.select(&self.h1_sel)
            .next()
            .map(|h| squash_ws(&h.text().collect::<String>()))
            .unwrap_or_default()
    }

    /// Date from the first of `texts` holding one. Within a text a range
    /// beats a single date, which beats a bare month and year.
    pub fn date<'a>(&self, texts: impl IntoIterator<Item = &'a str>) -> Option<MeetDate> {
        texts
            .into_iter()
            .find_map(|text| self.full_date(text).or_else(|| self.month_year(text)))
    }

    fn full_date(&self, text: &str) -> Option<MeetDate> {
        if let Some(c) = self.range_reg.captures(text) {
            let (year, month) = (&c[4], month_num(&c[1]));
            return Some(MeetDate {
                raw: whole(&c),
                start: format!("{year}-{month}-{:0>2}", &c[2]),
                end: format!("{year}-{month}-{:0>2}", &c[3]),
            });
        }
        let c = self.single_reg.captures(text)?;
        let start = format!("{}-{}-{:0>2}", &c[3], month_num(&c[1]), &c[2]);
        Some(MeetDate {
            raw: whole(&c),
            end: start.clone(),
            start,
        })
    }

    fn month_year(&self, text: &str) -> Option<MeetDate> {
        let c = self.month_year_reg.captures(text)?;
        Some(MeetDate {
            raw: whole(&c),
            start: format!("{}-{}", &c[2], month_num(&c[1])),
            end: String::new(),
        })
    }

    /// from the caption lines after the first, else a `City, ST` in `body`
    pub fn location(&self, caption: &[String], body: &str) -> String {
        let mut location = String::new();
        for line in caption.iter().skip(1) {
            if self.year_reg.is_match(line) {
                // the date line may also carry the place
                let stripped = self.date_phrase_reg.replace_all(line, "");
                let stripped = stripped.trim().trim_matches(',').trim();
                if stripped.chars().count() > 3 {
                    location = stripped.to_owned();
                }
                continue;
            }
            if line.contains(',') || line.chars().count() > 5 {
                location = line.clone();
                break;
            }
        }
        if location.is_empty() {
            if let Some(m) = self.city_state_reg.find(body) {
                location = m.as_str().trim().to_owned();
            }
        }
        location
    }

    /// label of the first source pattern found in the body
    pub fn source(&self, html: &Html) -> Option<&str> {
        let body = self.text.body_text(html, SOURCE_SCAN_CHARS);
        self.sources
            .iter()
            .find(|s| s.pattern.is_match(&body))
            .map(|s| s.label.as_str())
    }
}

fn whole(c: &Captures) -> String {
    c.get(0).map_or_else(String::new, |m| m.as_str().to_owned())
}

/// two digit month number from a full or abbreviated name
fn month_num(name: &str) -> &'static str {
    let abbr: String = name.chars().take(3).collect::<String>().to_ascii_lowercase();
    match abbr.as_str() {
        "jan" => "01",
        "feb" => "02",
        "mar" => "03",
        "apr" => "04",
        "may" => "05",
        "jun" => "06",
        "jul" => "07",
        "aug" => "08",
        "sep" => "09",
        "oct" => "10",
        "nov" => "11",
        "dec" => "12",
        _ => "??",
    }
}

/// Four digit year inferred from the start of a file name.
///
/// A `19xx`/`20xx` prefix is taken as is. Otherwise a two digit prefix `YY`
/// maps to `20YY` up to 30 and `19YY` above.
///
/// ```
/// # use arcdex::meta::year_from_filename;
/// assert_eq!(year_from_filename("96Marin.htm").as_deref(), Some("1996"));
/// assert_eq!(year_from_filename("03Nats.pdf").as_deref(), Some("2003"));
/// assert_eq!(year_from_filename("Marin.htm"), None);
/// ```
pub fn year_from_filename(name: &str) -> Option<String> {
    let stem = match name.rsplit_once('.') {
        Some((stem, _)) if !stem.is_empty() => stem,
        _ => name,
    };
    let digits: Vec<u8> = stem
        .bytes()
        .take(4)
        .take_while(u8::is_ascii_digit)
        .collect();
    if digits.len() == 4 && (digits.starts_with(b"19") || digits.starts_with(b"20")) {
        return Some(String::from_utf8_lossy(&digits).into_owned());
    }
    if digits.len() < 2 {
        return None;
    }
    let yy = u32::from(digits[0] - b'0') * 10 + u32::from(digits[1] - b'0');
    let year = if yy <= 30 { 2000 + yy } else { 1900 + yy };
    Some(year.to_string())
}
