use std::path::{Path, PathBuf};
use std::sync::Arc;

use anyhow::{Context, Result};
use arrow::array::{Float64Array, StringArray};
use arrow::datatypes::{DataType, Field, Schema};
use arrow::record_batch::RecordBatch;
use parquet::arrow::ArrowWriter;

/// Minimal deterministic PRNG (xoshiro256**)
struct SimpleRng {
    state: [u64; 4],
}

impl SimpleRng {
    fn new(seed: u64) -> Self {
        let mut s = [0u64; 4];
        let mut x = seed;
        for slot in &mut s {
            x = x.wrapping_mul(6364136223846793005).wrapping_add(1);
            *slot = x;
        }
        SimpleRng { state: s }
    }

    fn next_u64(&mut self) -> u64 {
        let result = (self.state[1].wrapping_mul(5))
            .rotate_left(7)
            .wrapping_mul(9);
        let t = self.state[1] << 17;
        self.state[2] ^= self.state[0];
        self.state[3] ^= self.state[1];
        self.state[1] ^= self.state[2];
        self.state[0] ^= self.state[3];
        self.state[2] ^= t;
        self.state[3] = self.state[3].rotate_left(45);
        result
    }

    fn next_f64(&mut self) -> f64 {
        (self.next_u64() >> 11) as f64 / (1u64 << 53) as f64
    }

    fn pick<'a, T>(&mut self, items: &'a [T]) -> &'a T {
        &items[(self.next_u64() % items.len() as u64) as usize]
    }
}

struct Book {
    title: &'static str,
    author: &'static str,
    category: &'static str,
    /// Mean review score the generated reviews drift towards.
    quality: f64,
}

const BOOKS: &[Book] = &[
    Book { title: "Dune", author: "Frank Herbert", category: "Fiction", quality: 4.6 },
    Book { title: "Emma", author: "Jane Austen", category: "Fiction", quality: 4.1 },
    Book { title: "Persuasion", author: "Jane Austen", category: "Fiction", quality: 4.3 },
    Book { title: "The Selfish Gene", author: "Richard Dawkins", category: "Science", quality: 4.0 },
    Book { title: "Cosmos", author: "Carl Sagan", category: "Science", quality: 4.7 },
    Book { title: "Ulysses", author: "James Joyce", category: "Fiction", quality: 3.2 },
    Book { title: "Salt", author: "Mark Kurlansky", category: "History", quality: 3.8 },
    Book { title: "SPQR", author: "Mary Beard", category: "History", quality: 4.2 },
    Book { title: "Walden", author: "Henry David Thoreau", category: "Philosophy", quality: 3.5 },
    Book { title: "Meditations", author: "Marcus Aurelius", category: "Philosophy", quality: 4.5 },
    Book { title: "The Road", author: "Cormac McCarthy", category: "Fiction", quality: 3.9 },
    Book { title: "Sapiens", author: "Yuval Noah Harari", category: "History", quality: 4.4 },
];

const PRAISE: &[&str] = &[
    "An excellent read, I loved it!",
    "Great book. Really well written.",
    "Wonderful characters and a brilliant ending...",
    "Very good; would recommend.",
    "Beautiful prose, a true masterpiece.",
];

const MIXED: &[&str] = &[
    "Interesting ideas, but a bit slow in places.",
    "It was fine. Not great, not terrible.",
    "Some parts were engaging, others dull.",
];

const CRITICISM: &[&str] = &[
    "Boring and predictable. Not worth it.",
    "Terrible pacing; I hated the ending!!",
    "Disappointing. The worst book this year.",
];

fn review_text(rng: &mut SimpleRng, score: f64) -> &'static str {
    if score >= 4.0 {
        *rng.pick(PRAISE)
    } else if score >= 3.0 {
        *rng.pick(MIXED)
    } else {
        *rng.pick(CRITICISM)
    }
}

fn write_books(path: &Path, rng: &mut SimpleRng) -> Result<usize> {
    let mut w = csv::Writer::from_path(path).context("creating books CSV")?;
    w.write_record(["book_title", "author", "category", "ratingsCount", "rating"])?;

    let mut records: Vec<[String; 5]> = Vec::with_capacity(BOOKS.len());
    for (i, b) in BOOKS.iter().enumerate() {
        // One book gets a rating count far above the rest.
        let count = if i == 0 { 25_000 } else { 40 + (rng.next_f64() * 200.0) as u64 };
        let record = [
            b.title.to_string(),
            b.author.to_string(),
            b.category.to_string(),
            count.to_string(),
            format!("{:.1}", b.quality),
        ];
        w.write_record(&record)?;
        records.push(record);
    }

    // An exact duplicate and a row with a missing category for the cleaner.
    w.write_record(&records[1])?;
    w.write_record(["Untitled Draft", "Anonymous", "", "3", "2.0"])?;

    w.flush()?;
    Ok(records.len() + 2)
}

struct Review {
    title: String,
    user: String,
    text: String,
    score: f64,
}

fn generate_reviews(rng: &mut SimpleRng) -> Vec<Review> {
    let mut reviews = Vec::new();
    for (i, b) in BOOKS.iter().enumerate() {
        // Popularity falls with position so review counts differ.
        let n = 30 - 2 * i;
        for _ in 0..n {
            let noise = (rng.next_f64() - 0.5) * 2.5;
            let score = (b.quality + noise).round().clamp(1.0, 5.0);
            let user = format!("U{:05}", rng.next_u64() % 100_000);
            reviews.push(Review {
                title: b.title.to_string(),
                user,
                text: review_text(rng, score).to_string(),
                score,
            });
        }
    }
    reviews
}

fn write_reviews_csv(path: &Path, reviews: &[Review]) -> Result<()> {
    let mut w = csv::Writer::from_path(path).context("creating reviews CSV")?;
    w.write_record(["book_title", "User_id", "review/text", "review/score"])?;
    for r in reviews {
        w.write_record([&r.title, &r.user, &r.text, &format!("{:.1}", r.score)])?;
    }
    // A repeated review and one with missing text for the cleaner.
    if let Some(r) = reviews.first() {
        w.write_record([&r.title, &r.user, &r.text, &format!("{:.1}", r.score)])?;
    }
    w.write_record(["Dune", "U99999", "", "5.0"])?;
    w.flush()?;
    Ok(())
}

fn write_reviews_parquet(path: &Path, reviews: &[Review]) -> Result<()> {
    let schema = Arc::new(Schema::new(vec![
        Field::new("book_title", DataType::Utf8, false),
        Field::new("User_id", DataType::Utf8, false),
        Field::new("review/text", DataType::Utf8, false),
        Field::new("review/score", DataType::Float64, false),
    ]));

    let batch = RecordBatch::try_new(
        schema.clone(),
        vec![
            Arc::new(StringArray::from_iter_values(reviews.iter().map(|r| r.title.as_str()))),
            Arc::new(StringArray::from_iter_values(reviews.iter().map(|r| r.user.as_str()))),
            Arc::new(StringArray::from_iter_values(reviews.iter().map(|r| r.text.as_str()))),
            Arc::new(Float64Array::from_iter_values(reviews.iter().map(|r| r.score))),
        ],
    )
    .context("building record batch")?;

    let file = std::fs::File::create(path).context("creating parquet file")?;
    let mut writer = ArrowWriter::try_new(file, schema, None).context("creating parquet writer")?;
    writer.write(&batch).context("writing batch")?;
    writer.close().context("closing parquet writer")?;
    Ok(())
}

fn main() -> Result<()> {
    let out_dir = std::env::args()
        .nth(1)
        .map(PathBuf::from)
        .unwrap_or_else(|| PathBuf::from("data"));
    std::fs::create_dir_all(&out_dir)
        .with_context(|| format!("creating {}", out_dir.display()))?;

    let mut rng = SimpleRng::new(42);

    let books_path = out_dir.join("books_data.csv");
    let n_books = write_books(&books_path, &mut rng)?;

    let reviews = generate_reviews(&mut rng);
    write_reviews_csv(&out_dir.join("books_rating.csv"), &reviews)?;
    write_reviews_parquet(&out_dir.join("books_rating.parquet"), &reviews)?;

    println!(
        "Wrote {n_books} books and {} reviews to {}",
        reviews.len() + 2,
        out_dir.display()
    );
    Ok(())
}
