/*!
TF-IDF vector space used by the lexical index.

This module implements the numerical building blocks:

- Tokenization (lowercase, runs of two or more word characters)
- Vocabulary and document-frequency fitting over a fixed document set
- Smoothed inverse document frequency
- Projection of arbitrary text into the fitted space, L2-normalized
- Row-parallel assembly of the document matrix

The vocabulary is frozen by [`TfidfVectorizer::fit`]. Text projected later only
contributes weight for terms seen at fit time.
*/

use std::collections::{BTreeMap, HashMap, HashSet};

use ndarray::{Array1, Array2, Axis};
use once_cell::sync::Lazy;
use rayon::prelude::*;
use regex::Regex;

static TOKEN_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\b\w\w+\b").expect("token pattern is a valid regex"));

/// Split `text` into lowercase tokens of at least two word characters.
///
/// # Arguments
///
/// * `text` - arbitrary input text
///
/// # Returns
///
/// Tokens in order of appearance (duplicates kept).
pub fn tokenize(text: &str) -> Vec<String> {
    let lowered = text.to_lowercase();
    TOKEN_RE
        .find_iter(&lowered)
        .map(|m| m.as_str().to_string())
        .collect()
}

/// Fitted term-frequency / inverse-document-frequency model.
#[derive(Debug, Clone)]
pub struct TfidfVectorizer {
    /// term -> column index; columns follow lexicographic term order.
    vocabulary: HashMap<String, usize>,
    idf: Array1<f32>,
}

impl TfidfVectorizer {
    /// Fit the vocabulary and IDF weights over `documents`.
    ///
    /// IDF is smoothed as if one extra document contained every term once:
    /// `idf(t) = ln((1 + n) / (1 + df(t))) + 1`.
    ///
    /// # Arguments
    ///
    /// * `documents` - the full document set; each entry counts as one document
    ///
    /// # Returns
    ///
    /// A vectorizer whose vocabulary may be empty when no document contains a token.
    pub fn fit<S: AsRef<str>>(documents: &[S]) -> Self {
        let mut doc_freq: BTreeMap<String, usize> = BTreeMap::new();
        for doc in documents {
            let unique: HashSet<String> = tokenize(doc.as_ref()).into_iter().collect();
            for term in unique {
                *doc_freq.entry(term).or_insert(0) += 1;
            }
        }

        let n = documents.len() as f32;
        let mut vocabulary = HashMap::with_capacity(doc_freq.len());
        let mut idf = Array1::<f32>::zeros(doc_freq.len());
        for (col, (term, df)) in doc_freq.into_iter().enumerate() {
            idf[col] = ((1.0 + n) / (1.0 + df as f32)).ln() + 1.0;
            vocabulary.insert(term, col);
        }

        Self { vocabulary, idf }
    }

    /// Number of distinct terms in the fitted space.
    pub fn vocabulary_len(&self) -> usize {
        self.vocabulary.len()
    }

    /// Column index of `term`, if it was seen at fit time.
    pub fn term_index(&self, term: &str) -> Option<usize> {
        self.vocabulary.get(term).copied()
    }

    /// IDF weight of `term`, if it was seen at fit time.
    pub fn idf(&self, term: &str) -> Option<f32> {
        self.term_index(term).map(|col| self.idf[col])
    }

    /// Project `text` into the fitted space.
    ///
    /// # Returns
    ///
    /// An L2-normalized vector of length `vocabulary_len()`. Text without any
    /// in-vocabulary term maps to the zero vector.
    pub fn transform(&self, text: &str) -> Array1<f32> {
        let mut v = Array1::<f32>::zeros(self.vocabulary.len());
        for term in tokenize(text) {
            if let Some(&col) = self.vocabulary.get(&term) {
                v[col] += 1.0;
            }
        }
        v *= &self.idf;
        let norm = v.dot(&v).sqrt();
        if norm > 0.0 {
            v /= norm;
        }
        v
    }

    /// Project every document into the fitted space, one row per document.
    pub fn transform_many<S: AsRef<str> + Sync>(&self, documents: &[S]) -> Array2<f32> {
        let mut mat = Array2::<f32>::zeros((documents.len(), self.vocabulary.len()));
        mat.axis_iter_mut(Axis(0))
            .into_par_iter()
            .zip(documents.par_iter())
            .for_each(|(mut row, doc)| row.assign(&self.transform(doc.as_ref())));
        mat
    }
}
