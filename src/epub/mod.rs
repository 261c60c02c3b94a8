mod builder;
mod bundle;
mod escape;

#[cfg(test)]
mod tests;

pub use builder::EpubBuilder;
pub use bundle::bundle_books;
pub use escape::escape_text;
