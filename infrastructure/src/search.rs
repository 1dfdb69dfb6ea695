use domain::models::Passage;

pub struct SearchEngine;

impl SearchEngine {
    /// Cosine similarity; zero-norm vectors score 0 instead of NaN. A zero
    /// score is always +0.0 so `total_cmp` treats it as a tie.
    pub fn cosine_similarity(a: &[f32], b: &[f32]) -> f32 {
        let dot_product: f32 = a.iter().zip(b.iter()).map(|(x, y)| x * y).sum();
        let norm_a: f32 = a.iter().map(|x| x * x).sum::<f32>().sqrt();
        let norm_b: f32 = b.iter().map(|x| x * x).sum::<f32>().sqrt();
        if dot_product == 0.0 || norm_a == 0.0 || norm_b == 0.0 {
            return 0.0;
        }
        dot_product / (norm_a * norm_b)
    }

    /// Top-k passages by similarity. The sort is stable, so ties keep
    /// insertion order.
    pub fn find_relevant_chunks(
        query_embedding: &[f32],
        passages: &[Passage],
        top_k: usize,
    ) -> Vec<String> {
        let mut similarities: Vec<(f32, &str)> = passages
            .iter()
            .map(|p| {
                (
                    Self::cosine_similarity(query_embedding, &p.vector),
                    &p.text[..],
                )
            })
            .collect();

        similarities.sort_by(|a, b| b.0.total_cmp(&a.0));
        similarities
            .into_iter()
            .take(top_k)
            .map(|(_, text)| text.to_string())
            .collect()
    }
}
