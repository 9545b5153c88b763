#![allow(dead_code)]

use std::fs;
use std::path::PathBuf;

use rusty_shelf::PipelineConfig;
use tempfile::TempDir;

pub const BOOKS_CSV: &str = "\
book_title,author,category,ratingsCount,rating
A,Ann,Fiction,1,4.0
B,Bob,Science,2,5.0
C,Ann,Fiction,2,3.0
D,Dee,History,3,4.5
E,Eve,Fiction,4,2.0
F,Bob,Science,100,3.5
B,Bob,Science,2,5.0
G,,Fiction,7,4.0
";

pub const REVIEWS_CSV: &str = "\
book_title,User_id,review/text,review/score
A,u1,Great book! Loved it.,5
B,u2,Boring and predictable...,2
A,u3,\"Excellent, really excellent\",5
C,u4,It was fine.,3
B,u5,Terrible.,1
A,u6,Good read,4
C,u7,,3
";

/// Two fixture inputs in a private temp dir.
pub struct Fixture {
    _tmp: TempDir,
    pub books: PathBuf,
    pub reviews: PathBuf,
}

impl Fixture {
    pub fn new() -> Self {
        Self::with(BOOKS_CSV, REVIEWS_CSV)
    }

    pub fn with(books: &str, reviews: &str) -> Self {
        let tmp = TempDir::new().expect("create temp dir");
        let books_path = tmp.path().join("books_data.csv");
        let reviews_path = tmp.path().join("books_rating.csv");
        fs::write(&books_path, books).expect("write books");
        fs::write(&reviews_path, reviews).expect("write reviews");
        Self {
            _tmp: tmp,
            books: books_path,
            reviews: reviews_path,
        }
    }

    pub fn dir(&self) -> PathBuf {
        self._tmp.path().to_path_buf()
    }

    pub fn config(&self) -> PipelineConfig {
        PipelineConfig {
            books_path: self.books.clone(),
            reviews_path: self.reviews.clone(),
            ..PipelineConfig::default()
        }
    }
}
