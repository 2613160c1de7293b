use std::collections::BTreeMap;
use std::sync::LazyLock;

use regex::Regex;

use super::vocabulary::VocabularyError;

static LEGEND_LINE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^(?P<indent>\s*)(?P<flags>[A-Za-z.]+) = (?P<meaning>.*)$")
        .expect("legend pattern is valid")
});

static SEPARATOR_LINE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^\s*-+\s*$").expect("separator pattern is valid"));

/// One `D..... = Decoding supported` line of a listing header.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct FlagLegend {
    pub position: usize,
    pub flag: char,
    pub meaning: String,
}

/// One data row of a capability listing.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ListingEntry {
    name: String,
    flags: String,
    description: String,
    fields: BTreeMap<String, String>,
}

impl ListingEntry {
    pub fn name(&self) -> &str {
        &self.name
    }

    /// The raw flag column, e.g. `DEV.LS`.
    pub fn flags(&self) -> &str {
        &self.flags
    }

    pub fn has_flag(&self, flag: char) -> bool {
        self.flags.contains(flag)
    }

    /// Everything after the name.
    pub fn description(&self) -> &str {
        &self.description
    }

    /// Value of a column declared in the `FLAGS NAME ...` row.
    pub fn field(&self, name: &str) -> Option<&str> {
        self.fields.get(name).map(String::as_str)
    }

    pub fn fields(&self) -> &BTreeMap<String, String> {
        &self.fields
    }
}

/// A parsed `-codecs` / `-pix_fmts` style listing, keyed by name.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Listing {
    legend: Vec<FlagLegend>,
    field_names: Vec<String>,
    entries: BTreeMap<String, ListingEntry>,
}

impl Listing {
    pub fn parse(text: &str) -> Result<Self, VocabularyError> {
        parse_listing(text)
    }

    pub fn get(&self, name: &str) -> Option<&ListingEntry> {
        self.entries.get(name)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.entries.contains_key(name)
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.entries.keys().map(String::as_str)
    }

    pub fn entries(&self) -> impl Iterator<Item = &ListingEntry> {
        self.entries.values()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn legend(&self) -> &[FlagLegend] {
        &self.legend
    }

    /// Extra column names, without the leading `FLAGS NAME`.
    pub fn field_names(&self) -> &[String] {
        &self.field_names
    }
}

struct LegendLine<'a> {
    line: &'a str,
    indent: &'a str,
    flags: &'a str,
    meaning: &'a str,
}

/// Parses the self-describing listing the tool prints for `-codecs` and
/// `-pix_fmts`.
///
/// Lines before the first legend line are skipped. The legend fixes the
/// width of the flag column and which letters may appear at each
/// position; data rows are matched against a pattern built from it.
pub fn parse_listing(text: &str) -> Result<Listing, VocabularyError> {
    let mut lines = text.lines().map(str::trim_end).peekable();

    while let Some(line) = lines.peek() {
        if LEGEND_LINE.is_match(line) {
            break;
        }
        lines.next();
    }

    let mut legend_lines = Vec::new();
    while let Some(caps) = lines.peek().and_then(|line| LEGEND_LINE.captures(*line)) {
        let line = caps.get(0).map_or("", |m| m.as_str());
        legend_lines.push(LegendLine {
            line,
            indent: caps.name("indent").map_or("", |m| m.as_str()),
            flags: caps.name("flags").map_or("", |m| m.as_str()),
            meaning: caps.name("meaning").map_or("", |m| m.as_str()),
        });
        lines.next();
    }
    let indent = legend_lines
        .iter()
        .map(|l| l.indent)
        .min_by_key(|indent| indent.len())
        .ok_or(VocabularyError::NoLegend)?;
    let legend = parse_legend(&legend_lines, indent.len())?;
    let width = legend_flag_width(&legend_lines[0], indent.len());

    let mut field_names = Vec::new();
    loop {
        let line = lines.next().ok_or(VocabularyError::MissingSeparator)?;
        if SEPARATOR_LINE.is_match(line) {
            break;
        }
        let mut words = line.split_whitespace();
        if words.next() == Some("FLAGS") && words.next() == Some("NAME") {
            field_names = words.map(str::to_string).collect();
        }
    }

    let row = row_pattern(indent, width, &legend)?;
    let mut entries = BTreeMap::new();
    for line in lines.filter(|line| !line.trim().is_empty()) {
        let Some(caps) = row.captures(line) else {
            log::debug!("skipping unrecognized listing row {line:?}");
            continue;
        };
        let name = caps["name"].to_string();
        let description = caps.name("rest").map_or("", |m| m.as_str()).to_string();
        let fields = field_names
            .iter()
            .cloned()
            .zip(description.split_whitespace().map(str::to_string))
            .collect();
        entries.entry(name.clone()).or_insert(ListingEntry {
            name,
            flags: caps["flags"].to_string(),
            description,
            fields,
        });
    }
    if entries.is_empty() {
        return Err(VocabularyError::NoRows);
    }

    Ok(Listing {
        legend,
        field_names,
        entries,
    })
}

fn legend_flag_width(legend: &LegendLine<'_>, base_indent: usize) -> usize {
    legend.indent.len() - base_indent + legend.flags.chars().count()
}

fn parse_legend(lines: &[LegendLine<'_>], base_indent: usize) -> Result<Vec<FlagLegend>, VocabularyError> {
    let padded = |l: &LegendLine<'_>| {
        format!("{}{}", " ".repeat(l.indent.len() - base_indent), l.flags)
    };
    let expected = padded(&lines[0]);
    lines
        .iter()
        .map(|l| {
            let flags = padded(l);
            if flags.chars().count() != expected.chars().count() {
                return Err(VocabularyError::MismatchedFlags {
                    expected: expected.clone(),
                    found: flags,
                });
            }
            let mut set = flags
                .chars()
                .enumerate()
                .filter(|&(_, c)| c != '.' && c != ' ');
            match (set.next(), set.next()) {
                (Some((position, flag)), None) => Ok(FlagLegend {
                    position,
                    flag,
                    meaning: l.meaning.trim().to_string(),
                }),
                _ => Err(VocabularyError::MalformedHeader {
                    line: l.line.to_string(),
                }),
            }
        })
        .collect()
}

fn row_pattern(indent: &str, width: usize, legend: &[FlagLegend]) -> Result<Regex, VocabularyError> {
    let mut classes = vec![String::from(". "); width];
    for entry in legend {
        classes[entry.position].push(entry.flag);
    }
    let flags: String = classes
        .iter()
        .map(|class| format!("[{}]", regex::escape(class)))
        .collect();
    let pattern = format!(
        r"^{}(?P<flags>{flags}) (?P<name>\S+)(?:\s+(?P<rest>.*))?$",
        regex::escape(indent)
    );
    Regex::new(&pattern).map_err(|_| VocabularyError::MalformedHeader { line: pattern })
}
