//! # Book and Version Catalog
//!
//! The static table of books, their per-chapter verse counts and lookup ids, plus the
//! list of translations the lookup service understands. Ids follow the 1-based canonical book
//! order (Genesis = 1 … Revelation = 66) used by the verse-lookup service.

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Testament {
    Old,
    New,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Book {
    pub id: u8,
    pub name: &'static str,
    pub testament: Testament,
    /// Verse count of each chapter (KJV versification), chapter 1 first.
    pub verses: &'static [u16],
}

impl Book {
    pub fn chapters(&self) -> u32 {
        self.verses.len() as u32
    }

    /// `None` when the chapter does not exist in this book.
    pub fn verse_count(&self, chapter: u32) -> Option<u32> {
        let index = usize::try_from(chapter.checked_sub(1)?).ok()?;
        self.verses.get(index).map(|&count| u32::from(count))
    }

    pub fn has_verse(&self, chapter: u32, verse: u32) -> bool {
        self.verse_count(chapter)
            .is_some_and(|count| (1..=count).contains(&verse))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Translation {
    pub code: &'static str,
    pub name: &'static str,
}

pub const DEFAULT_VERSION: &str = "KJV";

pub const VERSIONS: &[Translation] = &[
    Translation { code: "KJV", name: "King James Version" },
    Translation { code: "NKJV", name: "New King James Version" },
    Translation { code: "NIV", name: "New International Version" },
    Translation { code: "ESV", name: "English Standard Version" },
    Translation { code: "NASB", name: "New American Standard Bible" },
    Translation { code: "NLT", name: "New Living Translation" },
    Translation { code: "YLT", name: "Young's Literal Translation" },
    Translation { code: "WEB", name: "World English Bible" },
];

const fn book(id: u8, name: &'static str, testament: Testament, verses: &'static [u16]) -> Book {
    Book {
        id,
        name,
        testament,
        verses,
    }
}

use Testament::{New, Old};

pub const BOOKS: &[Book] = &[
    book(
        1,
        "Genesis",
        Old,
        &[
            31, 25, 24, 26, 32, 22, 24, 22, 29, 32, 32, 20, 18, 24, 21, 16, 27, 33, 38, 18, 34, 24,
            20, 67, 34, 35, 46, 22, 35, 43, 55, 32, 20, 31, 29, 43, 36, 30, 23, 23, 57, 38, 34, 34,
            28, 34, 31, 22, 33, 26,
        ],
    ),
    book(
        2,
        "Exodus",
        Old,
        &[
            22, 25, 22, 31, 23, 30, 25, 32, 35, 29, 10, 51, 22, 31, 27, 36, 16, 27, 25, 26, 36, 31,
            33, 18, 40, 37, 21, 43, 46, 38, 18, 35, 23, 35, 35, 38, 29, 31, 43, 38,
        ],
    ),
    book(
        3,
        "Leviticus",
        Old,
        &[
            17, 16, 17, 35, 19, 30, 38, 36, 24, 20, 47, 8, 59, 57, 33, 34, 16, 30, 37, 27, 24, 33,
            44, 23, 55, 46, 34,
        ],
    ),
    book(
        4,
        "Numbers",
        Old,
        &[
            54, 34, 51, 49, 31, 27, 89, 26, 23, 36, 35, 16, 33, 45, 41, 50, 13, 32, 22, 29, 35, 41,
            30, 25, 18, 65, 23, 31, 40, 16, 54, 42, 56, 29, 34, 13,
        ],
    ),
    book(
        5,
        "Deuteronomy",
        Old,
        &[
            46, 37, 29, 49, 33, 25, 26, 20, 29, 22, 32, 32, 18, 29, 23, 22, 20, 22, 21, 20, 23, 30,
            25, 22, 19, 19, 26, 68, 29, 20, 30, 52, 29, 12,
        ],
    ),
    book(
        6,
        "Joshua",
        Old,
        &[
            18, 24, 17, 24, 15, 27, 26, 35, 27, 43, 23, 24, 33, 15, 63, 10, 18, 28, 51, 9, 45, 34,
            16, 33,
        ],
    ),
    book(
        7,
        "Judges",
        Old,
        &[
            36, 23, 31, 24, 31, 40, 25, 35, 57, 18, 40, 15, 25, 20, 20, 31, 13, 31, 30, 48, 25,
        ],
    ),
    book(8, "Ruth", Old, &[22, 23, 18, 22]),
    book(
        9,
        "1 Samuel",
        Old,
        &[
            28, 36, 21, 22, 12, 21, 17, 22, 27, 27, 15, 25, 23, 52, 35, 23, 58, 30, 24, 42, 15, 23,
            29, 22, 44, 25, 12, 25, 11, 31, 13,
        ],
    ),
    book(
        10,
        "2 Samuel",
        Old,
        &[
            27, 32, 39, 12, 25, 23, 29, 18, 13, 19, 27, 31, 39, 33, 37, 23, 29, 33, 43, 26, 22, 51,
            39, 25,
        ],
    ),
    book(
        11,
        "1 Kings",
        Old,
        &[
            53, 46, 28, 34, 18, 38, 51, 66, 28, 29, 43, 33, 34, 31, 34, 34, 24, 46, 21, 43, 29, 53,
        ],
    ),
    book(
        12,
        "2 Kings",
        Old,
        &[
            18, 25, 27, 44, 27, 33, 20, 29, 37, 36, 21, 21, 25, 29, 38, 20, 41, 37, 37, 21, 26, 20,
            37, 20, 30,
        ],
    ),
    book(
        13,
        "1 Chronicles",
        Old,
        &[
            54, 55, 24, 43, 26, 81, 40, 40, 44, 14, 47, 40, 14, 17, 29, 43, 27, 17, 19, 8, 30, 19,
            32, 31, 31, 32, 34, 21, 30,
        ],
    ),
    book(
        14,
        "2 Chronicles",
        Old,
        &[
            17, 18, 17, 22, 14, 42, 22, 18, 31, 19, 23, 16, 22, 15, 19, 14, 19, 34, 11, 37, 20, 12,
            21, 27, 28, 23, 9, 27, 36, 27, 21, 33, 25, 33, 27, 23,
        ],
    ),
    book(15, "Ezra", Old, &[11, 70, 13, 24, 17, 22, 28, 36, 15, 44]),
    book(16, "Nehemiah", Old, &[11, 20, 32, 23, 19, 19, 73, 18, 38, 39, 36, 47, 31]),
    book(17, "Esther", Old, &[22, 23, 15, 17, 14, 14, 10, 17, 32, 3]),
    book(
        18,
        "Job",
        Old,
        &[
            22, 13, 26, 21, 27, 30, 21, 22, 35, 22, 20, 25, 28, 22, 35, 22, 16, 21, 29, 29, 34, 30,
            17, 25, 6, 14, 23, 28, 25, 31, 40, 22, 33, 37, 16, 33, 24, 41, 30, 24, 34, 17,
        ],
    ),
    book(
        19,
        "Psalms",
        Old,
        &[
            6, 12, 8, 8, 12, 10, 17, 9, 20, 18, 7, 8, 6, 7, 5, 11, 15, 50, 14, 9, 13, 31, 6, 10, 22,
            12, 14, 9, 11, 12, 24, 11, 22, 22, 28, 12, 40, 22, 13, 17, 13, 11, 5, 26, 17, 11, 9, 14,
            20, 23, 19, 9, 6, 7, 23, 13, 11, 11, 17, 12, 8, 12, 11, 10, 13, 20, 7, 35, 36, 5, 24,
            20, 28, 23, 10, 12, 20, 72, 13, 19, 16, 8, 18, 12, 13, 17, 7, 18, 52, 17, 16, 15, 5, 23,
            11, 13, 12, 9, 9, 5, 8, 28, 22, 35, 45, 48, 43, 13, 31, 7, 10, 10, 9, 8, 18, 19, 2, 29,
            176, 7, 8, 9, 4, 8, 5, 6, 5, 6, 8, 8, 3, 18, 3, 3, 21, 26, 9, 8, 24, 13, 10, 7, 12, 15,
            21, 10, 20, 14, 9, 6,
        ],
    ),
    book(
        20,
        "Proverbs",
        Old,
        &[
            33, 22, 35, 27, 23, 35, 27, 36, 18, 32, 31, 28, 25, 35, 33, 33, 28, 24, 29, 30, 31, 29,
            35, 34, 28, 28, 27, 28, 27, 33, 31,
        ],
    ),
    book(21, "Ecclesiastes", Old, &[18, 26, 22, 16, 20, 12, 29, 17, 18, 20, 10, 14]),
    book(22, "Song of Solomon", Old, &[17, 17, 11, 16, 16, 13, 13, 14]),
    book(
        23,
        "Isaiah",
        Old,
        &[
            31, 22, 26, 6, 30, 13, 25, 22, 21, 34, 16, 6, 22, 32, 9, 14, 14, 7, 25, 6, 17, 25, 18,
            23, 12, 21, 13, 29, 24, 33, 9, 20, 24, 17, 10, 22, 38, 22, 8, 31, 29, 25, 28, 28, 25,
            13, 15, 22, 26, 11, 23, 15, 12, 17, 13, 12, 21, 14, 21, 22, 11, 12, 19, 12, 25, 24,
        ],
    ),
    book(
        24,
        "Jeremiah",
        Old,
        &[
            19, 37, 25, 31, 31, 30, 34, 22, 26, 25, 23, 17, 27, 22, 21, 21, 27, 23, 15, 18, 14, 30,
            40, 10, 38, 24, 22, 17, 32, 24, 40, 44, 26, 22, 19, 32, 21, 28, 18, 16, 18, 22, 13, 30,
            5, 28, 7, 47, 39, 46, 64, 34,
        ],
    ),
    book(25, "Lamentations", Old, &[22, 22, 66, 22, 22]),
    book(
        26,
        "Ezekiel",
        Old,
        &[
            28, 10, 27, 17, 17, 14, 27, 18, 11, 22, 25, 28, 23, 23, 8, 63, 24, 32, 14, 49, 32, 31,
            49, 27, 17, 21, 36, 26, 21, 26, 18, 32, 33, 31, 15, 38, 28, 23, 29, 49, 26, 20, 27, 31,
            25, 24, 23, 35,
        ],
    ),
    book(27, "Daniel", Old, &[21, 49, 30, 37, 31, 28, 28, 27, 27, 21, 45, 13]),
    book(28, "Hosea", Old, &[11, 23, 5, 19, 15, 11, 16, 14, 17, 15, 12, 14, 16, 9]),
    book(29, "Joel", Old, &[20, 32, 21]),
    book(30, "Amos", Old, &[15, 16, 15, 13, 27, 14, 17, 14, 15]),
    book(31, "Obadiah", Old, &[21]),
    book(32, "Jonah", Old, &[17, 10, 10, 11]),
    book(33, "Micah", Old, &[16, 13, 12, 13, 15, 16, 20]),
    book(34, "Nahum", Old, &[15, 13, 19]),
    book(35, "Habakkuk", Old, &[17, 20, 19]),
    book(36, "Zephaniah", Old, &[18, 15, 20]),
    book(37, "Haggai", Old, &[15, 23]),
    book(38, "Zechariah", Old, &[21, 13, 10, 14, 11, 15, 14, 23, 17, 12, 17, 14, 9, 21]),
    book(39, "Malachi", Old, &[14, 17, 18, 6]),
    book(
        40,
        "Matthew",
        New,
        &[
            25, 23, 17, 25, 48, 34, 29, 34, 38, 42, 30, 50, 58, 36, 39, 28, 27, 35, 30, 34, 46, 46,
            39, 51, 46, 75, 66, 20,
        ],
    ),
    book(41, "Mark", New, &[45, 28, 35, 41, 43, 56, 37, 38, 50, 52, 33, 44, 37, 72, 47, 20]),
    book(
        42,
        "Luke",
        New,
        &[
            80, 52, 38, 44, 39, 49, 50, 56, 62, 42, 54, 59, 35, 35, 32, 31, 37, 43, 48, 47, 38, 71,
            56, 53,
        ],
    ),
    book(
        43,
        "John",
        New,
        &[
            51, 25, 36, 54, 47, 71, 53, 59, 41, 42, 57, 50, 38, 31, 27, 33, 26, 40, 42, 31, 25,
        ],
    ),
    book(
        44,
        "Acts",
        New,
        &[
            26, 47, 26, 37, 42, 15, 60, 40, 43, 48, 30, 25, 52, 28, 41, 40, 34, 28, 41, 38, 40, 30,
            35, 27, 27, 32, 44, 31,
        ],
    ),
    book(45, "Romans", New, &[32, 29, 31, 25, 21, 23, 25, 39, 33, 21, 36, 21, 14, 23, 33, 27]),
    book(
        46,
        "1 Corinthians",
        New,
        &[
            31, 16, 23, 21, 13, 20, 40, 13, 27, 33, 34, 31, 13, 40, 58, 24,
        ],
    ),
    book(47, "2 Corinthians", New, &[24, 17, 18, 18, 21, 18, 16, 24, 15, 18, 33, 21, 14]),
    book(48, "Galatians", New, &[24, 21, 29, 31, 26, 18]),
    book(49, "Ephesians", New, &[23, 22, 21, 32, 33, 24]),
    book(50, "Philippians", New, &[30, 30, 21, 23]),
    book(51, "Colossians", New, &[29, 23, 25, 18]),
    book(52, "1 Thessalonians", New, &[10, 20, 13, 18, 28]),
    book(53, "2 Thessalonians", New, &[12, 17, 18]),
    book(54, "1 Timothy", New, &[20, 15, 16, 16, 25, 21]),
    book(55, "2 Timothy", New, &[18, 26, 17, 22]),
    book(56, "Titus", New, &[16, 15, 15]),
    book(57, "Philemon", New, &[25]),
    book(58, "Hebrews", New, &[14, 18, 19, 16, 14, 20, 28, 13, 28, 39, 40, 29, 25]),
    book(59, "James", New, &[27, 26, 18, 17, 20]),
    book(60, "1 Peter", New, &[25, 25, 22, 19, 14]),
    book(61, "2 Peter", New, &[21, 22, 18]),
    book(62, "1 John", New, &[10, 29, 24, 21, 21]),
    book(63, "2 John", New, &[13]),
    book(64, "3 John", New, &[14]),
    book(65, "Jude", New, &[25]),
    book(
        66,
        "Revelation",
        New,
        &[
            20, 29, 22, 11, 14, 17, 17, 13, 21, 11, 19, 17, 18, 20, 8, 21, 18, 24, 21, 15, 27, 21,
        ],
    ),
];

/// Resolves a book by name. An exact (case-insensitive) match wins; otherwise a
/// prefix is accepted when it identifies exactly one book.
pub fn find_book(name: &str) -> Option<Book> {
    let needle = name.trim().to_lowercase();
    if needle.is_empty() {
        return None;
    }

    if let Some(book) = BOOKS.iter().find(|b| b.name.to_lowercase() == needle) {
        return Some(*book);
    }

    let mut candidates = BOOKS
        .iter()
        .filter(|b| b.name.to_lowercase().starts_with(&needle));
    match (candidates.next(), candidates.next()) {
        (Some(book), None) => Some(*book),
        _ => None,
    }
}

/// Case-insensitive substring filter, split by testament.
pub fn search_books(query: &str) -> (Vec<Book>, Vec<Book>) {
    let needle = query.trim().to_lowercase();
    BOOKS
        .iter()
        .filter(|b| b.name.to_lowercase().contains(&needle))
        .copied()
        .partition(|b| b.testament == Testament::Old)
}

pub fn find_version(code: &str) -> Option<Translation> {
    VERSIONS
        .iter()
        .find(|v| v.code.eq_ignore_ascii_case(code.trim()))
        .copied()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn catalog_has_every_book_in_order() {
        assert_eq!(BOOKS.len(), 66);
        for (i, b) in BOOKS.iter().enumerate() {
            assert_eq!(b.id as usize, i + 1, "{} out of order", b.name);
        }
        assert_eq!(BOOKS.iter().filter(|b| b.testament == Testament::Old).count(), 39);
    }

    #[test]
    fn chapter_and_verse_counts() {
        let john = find_book("John").unwrap();
        assert_eq!(john.chapters(), 21);
        assert_eq!(john.verse_count(3), Some(36));
        assert_eq!(john.verse_count(11), Some(57));
        assert_eq!(john.verse_count(0), None);
        assert_eq!(john.verse_count(22), None);

        let psalms = find_book("Psalms").unwrap();
        assert_eq!(psalms.chapters(), 150);
        assert_eq!(psalms.verse_count(117), Some(2));
        assert_eq!(psalms.verse_count(119), Some(176));

        assert_eq!(find_book("Obadiah").unwrap().verses.to_vec(), vec![21]);
    }

    #[test]
    fn verse_table_totals() {
        let total = |t: Testament| -> u32 {
            BOOKS
                .iter()
                .filter(|b| b.testament == t)
                .flat_map(|b| b.verses.iter().map(|&v| u32::from(v)))
                .sum()
        };
        assert_eq!(total(Testament::Old), 23_145);
        assert_eq!(total(Testament::New), 7_957);
        assert_eq!(BOOKS.iter().map(|b| b.chapters()).sum::<u32>(), 1_189);
        assert!(BOOKS.iter().all(|b| b.verses.iter().all(|&v| v > 0)));
    }

    #[test]
    fn has_verse_checks_both_bounds() {
        let john = find_book("John").unwrap();
        assert!(john.has_verse(3, 1));
        assert!(john.has_verse(3, 36));
        assert!(!john.has_verse(3, 37));
        assert!(!john.has_verse(3, 0));
        assert!(!john.has_verse(22, 1));
    }

    #[test]
    fn exact_name_beats_prefix() {
        // the epistles contain "john" too; the exact match decides
        assert_eq!(find_book("john").unwrap().id, 43);
        assert_eq!(find_book("1 john").unwrap().id, 62);
    }

    #[test]
    fn unique_prefix_resolves() {
        assert_eq!(find_book("gen").unwrap().name, "Genesis");
        assert_eq!(find_book("Rev").unwrap().name, "Revelation");
    }

    #[test]
    fn ambiguous_prefix_is_rejected() {
        // Joshua, Job, Joel, John, Jonah
        assert!(find_book("jo").is_none());
        assert!(find_book("").is_none());
    }

    #[test]
    fn search_splits_by_testament() {
        let (old, new) = search_books("john");
        assert!(old.is_empty());
        assert_eq!(
            new.iter().map(|b| b.name).collect::<Vec<_>>(),
            vec!["John", "1 John", "2 John", "3 John"]
        );

        let (old, new) = search_books("");
        assert_eq!(old.len(), 39);
        assert_eq!(new.len(), 27);
    }

    #[test]
    fn version_lookup_ignores_case() {
        assert_eq!(find_version("esv").unwrap().code, "ESV");
        assert!(find_version("XYZ").is_none());
    }
}
