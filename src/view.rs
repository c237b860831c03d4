//! HTML rendering.
//!
//! Pages are HTML files embedded at compile time and filled by placeholder
//! replacement. Every value that came from a visitor goes through
//! [`escape_html`] first.

use std::fmt::Write;

use crate::review::Review;

const LAYOUT: &str = include_str!("../templates/layout.html");
const HOME: &str = include_str!("../templates/index.html");
const FAQ: &str = include_str!("../templates/faq.html");
const PRODUCTS: &str = include_str!("../templates/products.html");
const REVIEWS: &str = include_str!("../templates/reviews.html");

const MAX_STARS: i64 = 5;

pub fn home() -> String {
    layout("Home", HOME)
}

pub fn faq() -> String {
    layout("FAQ", FAQ)
}

pub fn products() -> String {
    layout("Products", PRODUCTS)
}

/// The reviews listing, in the order given.
pub fn reviews(reviews: &[Review]) -> String {
    let count = match reviews.len() {
        0 => "No reviews yet. Be the first!".to_owned(),
        1 => "1 review".to_owned(),
        n => format!("{n} reviews"),
    };

    let mut cards = String::new();
    for review in reviews {
        review_card(&mut cards, review);
    }

    let content = REVIEWS.replace("{count}", &count).replace("{reviews}", &cards);
    layout("Reviews", &content)
}

/// Error page shown when the review document cannot be read.
pub fn unavailable() -> String {
    layout(
        "Unavailable",
        "<h1>Reviews are unavailable</h1>\n<p>Something went wrong loading reviews. Please try again later.</p>",
    )
}

fn layout(title: &str, content: &str) -> String {
    // Title first: content is never rescanned for placeholders.
    LAYOUT.replace("{title}", title).replace("{content}", content)
}

fn review_card(out: &mut String, review: &Review) {
    // Writing to a String cannot fail.
    let _ = write!(
        out,
        r#"<div class="review-card">
  <div class="review-header">
    <h3>{name}</h3>
    <div class="review-stars" title="{rating} out of 5">{stars}</div>
  </div>
  <p>{text}</p>
  <div class="review-date">{date}</div>
</div>
"#,
        name = escape_html(&review.display_name),
        rating = review.rating,
        stars = stars(review.rating),
        text = escape_html(&review.review_text),
        date = escape_html(&display_date(review)),
    );
}

/// `★` per point of rating, `☆` for the rest, clamped to five stars.
pub fn stars(rating: i64) -> String {
    let filled = rating.clamp(0, MAX_STARS) as usize;
    let mut s = "★".repeat(filled);
    s.push_str(&"☆".repeat(MAX_STARS as usize - filled));
    s
}

fn display_date(review: &Review) -> String {
    match review.created_at() {
        Some(ts) => ts.format("%B %-d, %Y at %H:%M").to_string(),
        None => review.timestamp.clone(),
    }
}

pub fn escape_html(input: &str) -> String {
    let mut out = String::with_capacity(input.len());
    for c in input.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            c => out.push(c),
        }
    }
    out
}
