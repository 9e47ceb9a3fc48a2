// Pretrained word vectors — download and loading.
//
// The similarity code only sees the EmbeddingModel trait. This module is the
// concrete provider: fastText Common Crawl vectors fetched once and parsed
// into memory.

pub mod download;
pub mod vectors;
