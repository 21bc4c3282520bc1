use std::cmp::Ordering;

/// One entry of the exam index.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IndexRow {
    pub topic: String,
    pub book: String,
    pub page: String,
    pub comment: String,
}

impl IndexRow {
    pub fn new(
        topic: impl Into<String>,
        book: impl Into<String>,
        page: impl Into<String>,
        comment: impl Into<String>,
    ) -> Self {
        Self {
            topic: topic.into(),
            book: book.into(),
            page: page.into(),
            comment: comment.into(),
        }
    }

    /// Heading of the section this row is filed under: `#` for topics that do not
    /// start with a letter, otherwise the letter as upper+lower (`Nn`).
    pub fn heading(&self) -> String {
        match self.topic.chars().next() {
            Some(c) if c.is_alphabetic() => {
                let mut out: String = c.to_uppercase().collect();
                out.extend(c.to_lowercase());
                out
            }
            _ => "#".to_string(),
        }
    }

    fn starts_with_letter(&self) -> bool {
        self.topic.chars().next().is_some_and(char::is_alphabetic)
    }
}

/// A run of consecutive rows sharing a heading.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Section {
    pub heading: String,
    pub rows: Vec<IndexRow>,
}

/// Plain numbers come first, in numeric order; anything else follows as text.
fn compare_ref(a: &str, b: &str) -> Ordering {
    match (a.parse::<u64>(), b.parse::<u64>()) {
        (Ok(x), Ok(y)) => x.cmp(&y).then_with(|| a.cmp(b)),
        (Ok(_), Err(_)) => Ordering::Less,
        (Err(_), Ok(_)) => Ordering::Greater,
        (Err(_), Err(_)) => a.cmp(b),
    }
}

fn compare_rows(a: &IndexRow, b: &IndexRow) -> Ordering {
    a.starts_with_letter()
        .cmp(&b.starts_with_letter())
        .then_with(|| a.topic.to_lowercase().cmp(&b.topic.to_lowercase()))
        .then_with(|| compare_ref(&a.book, &b.book))
        .then_with(|| compare_ref(&a.page, &b.page))
        .then_with(|| a.comment.to_lowercase().cmp(&b.comment.to_lowercase()))
}

/// Case-insensitive lookup order; non-letter topics first. Stable.
pub fn sort_rows(rows: &mut [IndexRow]) {
    rows.sort_by(compare_rows);
}

pub fn group_sections(rows: Vec<IndexRow>) -> Vec<Section> {
    let mut sections: Vec<Section> = Vec::new();
    for row in rows {
        let heading = row.heading();
        match sections.last_mut() {
            Some(s) if s.heading == heading => s.rows.push(row),
            _ => sections.push(Section {
                heading,
                rows: vec![row],
            }),
        }
    }
    sections
}
