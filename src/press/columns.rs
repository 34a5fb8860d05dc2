//! Header-driven column lookup for the press table.

/// Logical fields the mapper reads, with the header label that identifies each.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Field {
    Title,
    Description,
    Image,
    Attachments,
    Date,
}

impl Field {
    pub const ALL: [Field; 5] = [
        Field::Title,
        Field::Description,
        Field::Image,
        Field::Attachments,
        Field::Date,
    ];

    pub fn header_key(self) -> &'static str {
        match self {
            Field::Title => "Title",
            Field::Description => "Description",
            Field::Image => "Image",
            Field::Attachments => "Attachments",
            Field::Date => "Date",
        }
    }

    /// Date only matches as a whole word, so "Last Updated" or "Candidate" never do.
    fn whole_word_only(self) -> bool {
        matches!(self, Field::Date)
    }
}

fn has_word(header: &str, word: &str) -> bool {
    header
        .split(|c: char| !c.is_alphanumeric())
        .any(|w| w.eq_ignore_ascii_case(word))
}

/// Position of each field in a row; `None` when no header mentions it.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ColumnIndexMap {
    pub title: Option<usize>,
    pub description: Option<usize>,
    pub image: Option<usize>,
    pub attachments: Option<usize>,
    pub date: Option<usize>,
}

impl ColumnIndexMap {
    /// Exact-case substring search on the capitalised label first, then a
    /// case-insensitive one. The leftmost header wins within each pass, so
    /// `["Subtitle", "Title"]` maps Title to 1.
    pub fn from_headers<S: AsRef<str>>(headers: &[S]) -> Self {
        let lowered: Vec<String> = headers.iter().map(|h| h.as_ref().to_lowercase()).collect();
        let find = |f: Field| {
            let key = f.header_key();
            if f.whole_word_only() {
                return headers.iter().position(|h| has_word(h.as_ref(), key));
            }
            headers
                .iter()
                .position(|h| h.as_ref().contains(key))
                .or_else(|| {
                    let key = key.to_lowercase();
                    lowered.iter().position(|h| h.contains(&key))
                })
        };

        Self {
            title: find(Field::Title),
            description: find(Field::Description),
            image: find(Field::Image),
            attachments: find(Field::Attachments),
            date: find(Field::Date),
        }
    }

    pub fn index_of(&self, field: Field) -> Option<usize> {
        match field {
            Field::Title => self.title,
            Field::Description => self.description,
            Field::Image => self.image,
            Field::Attachments => self.attachments,
            Field::Date => self.date,
        }
    }

    /// Cell text for `field`, or `""` when the column is absent or the row is short.
    pub fn get<'a>(&self, field: Field, cells: &'a [String]) -> &'a str {
        self.index_of(field)
            .and_then(|i| cells.get(i))
            .map(String::as_str)
            .unwrap_or("")
    }

    pub fn missing(&self) -> Vec<Field> {
        Field::ALL
            .into_iter()
            .filter(|f| self.index_of(*f).is_none())
            .collect()
    }
}
