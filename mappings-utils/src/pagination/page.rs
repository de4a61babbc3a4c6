//! Pure page shaping: result pairs and text chunks into page groups.

use mappings_data::ResultEntry;

/// Number of version labels listed per info page.
pub const VERSION_CHUNK_SIZE: usize = 10;

/// Which of the two logical page groups a page belongs to.
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
pub enum PageGroup {
    /// Compact renderings; the group every session starts in.
    More,
    /// Detailed renderings.
    Less,
}

impl PageGroup {
    pub fn other(self) -> Self {
        match self {
            Self::More => Self::Less,
            Self::Less => Self::More,
        }
    }
}

/// One rendered page.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct Page {
    pub title: String,
    pub footer: Option<String>,
    pub body: String,
    pub group: PageGroup,
}

/// The pages of a session, split into the `More` group and an optional `Less` group.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct PageSet {
    more: Vec<Page>,
    less: Vec<Page>,
}

impl PageSet {
    /// Build pages from lookup results, one page per entry.
    ///
    /// Returns `None` for an empty result list. The `Less` group is only
    /// produced when some long form differs from its short form.
    pub fn from_results(title: &str, footer: Option<&str>, entries: &[ResultEntry]) -> Option<Self> {
        if entries.is_empty() {
            return None;
        }

        let (short, long): (Vec<&str>, Vec<&str>) = entries
            .iter()
            .map(|entry| (entry.short.as_str(), entry.long.as_str()))
            .unzip();

        let more = build_group(title, footer, &short, PageGroup::More);
        let less = if short == long {
            Vec::new()
        } else {
            build_group(title, footer, &long, PageGroup::Less)
        };

        Some(Self { more, less })
    }

    /// Build a single-group page set from pre-rendered text blocks.
    pub fn from_chunks(title: &str, footer: Option<&str>, chunks: &[String]) -> Option<Self> {
        if chunks.is_empty() {
            return None;
        }

        let bodies: Vec<&str> = chunks.iter().map(String::as_str).collect();

        Some(Self {
            more: build_group(title, footer, &bodies, PageGroup::More),
            less: Vec::new(),
        })
    }

    pub fn group(&self, group: PageGroup) -> &[Page] {
        match group {
            PageGroup::More => &self.more,
            PageGroup::Less => &self.less,
        }
    }

    pub fn has_group(&self, group: PageGroup) -> bool {
        !self.group(group).is_empty()
    }

    pub fn len(&self, group: PageGroup) -> usize {
        self.group(group).len()
    }

    pub fn page(&self, group: PageGroup, index: usize) -> Option<&Page> {
        self.group(group).get(index)
    }
}

fn build_group(title: &str, footer: Option<&str>, bodies: &[&str], group: PageGroup) -> Vec<Page> {
    bodies
        .iter()
        .map(|body| Page {
            title: title.to_owned(),
            footer: footer.map(ToOwned::to_owned),
            body: (*body).to_owned(),
            group,
        })
        .collect()
}

/// Render labels as bulleted lines, `per_page` labels per block.
///
/// `annotate` returns a note for labels that should be highlighted
/// (e.g. `Default: Snapshot`).
pub fn bulleted_chunks<F>(labels: &[String], per_page: usize, annotate: F) -> Vec<String>
where
    F: Fn(&str) -> Option<String>,
{
    labels
        .chunks(per_page.max(1))
        .map(|chunk| {
            chunk
                .iter()
                .map(|label| match annotate(label) {
                    Some(note) => format!("**» {label}** ({note})"),
                    None => format!("**»** {label}"),
                })
                .collect::<Vec<_>>()
                .join("\n")
        })
        .collect()
}
