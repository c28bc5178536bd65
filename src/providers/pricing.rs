//! Static per-model price tables.
//!
//! Prices are USD per million tokens. Lookup is by longest matching model
//! prefix, so dated snapshots (`gpt-4o-2024-08-06`) resolve to their family.

/// Price of one model family.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ModelPrice {
    pub prefix: &'static str,
    pub input_per_million: f64,
    pub output_per_million: f64,
}

impl ModelPrice {
    pub const fn new(prefix: &'static str, input: f64, output: f64) -> Self {
        Self {
            prefix,
            input_per_million: input,
            output_per_million: output,
        }
    }

    pub fn cost(&self, input_tokens: u64, output_tokens: u64) -> f64 {
        (input_tokens as f64 * self.input_per_million
            + output_tokens as f64 * self.output_per_million)
            / 1_000_000.0
    }
}

pub const OPENAI_PRICES: &[ModelPrice] = &[
    ModelPrice::new("gpt-4o-mini", 0.15, 0.60),
    ModelPrice::new("gpt-4o", 2.50, 10.00),
    ModelPrice::new("gpt-4-turbo", 10.00, 30.00),
    ModelPrice::new("gpt-4-32k", 60.00, 120.00),
    ModelPrice::new("gpt-4", 30.00, 60.00),
    ModelPrice::new("gpt-3.5-turbo", 0.50, 1.50),
    ModelPrice::new("o1-mini", 3.00, 12.00),
    ModelPrice::new("o1", 15.00, 60.00),
];

#[cfg(feature = "groq")]
pub const GROQ_PRICES: &[ModelPrice] = &[
    ModelPrice::new("llama-3.1-8b-instant", 0.05, 0.08),
    ModelPrice::new("llama-3.1-70b-versatile", 0.59, 0.79),
    ModelPrice::new("llama3-8b-8192", 0.05, 0.08),
    ModelPrice::new("llama3-70b-8192", 0.59, 0.79),
    ModelPrice::new("mixtral-8x7b-32768", 0.24, 0.24),
    ModelPrice::new("gemma2-9b-it", 0.20, 0.20),
    ModelPrice::new("gemma-7b-it", 0.07, 0.07),
];

/// Find the entry with the longest prefix of `model`.
pub fn lookup<'a>(table: &'a [ModelPrice], model: &str) -> Option<&'a ModelPrice> {
    table
        .iter()
        .filter(|price| model.starts_with(price.prefix))
        .max_by_key(|price| price.prefix.len())
}

/// Cost of a call, or `None` for unknown models.
pub fn cost_for(
    table: &[ModelPrice],
    model: &str,
    input_tokens: u64,
    output_tokens: u64,
) -> Option<f64> {
    lookup(table, model).map(|price| price.cost(input_tokens, output_tokens))
}
