use burn::{
    nn::{
        loss::CrossEntropyLossConfig,
        Embedding, EmbeddingConfig,
        Linear, LinearConfig,
        Lstm, LstmConfig,
    },
    prelude::*,
};

// NOTE: #[derive(Config)] already generates Clone and Serialize/Deserialize
// internally — do NOT add them again or you get conflicting impls.
#[derive(Config, Debug)]
pub struct CharRnnConfig {
    pub vocab_size:  usize,
    #[config(default = 128)]
    pub hidden_size: usize,
}

impl CharRnnConfig {
    pub fn init<B: Backend>(&self, device: &B::Device) -> CharRnn<B> {
        let embedding = EmbeddingConfig::new(self.vocab_size, self.hidden_size).init(device);
        let lstm      = LstmConfig::new(self.hidden_size, self.hidden_size, true).init(device);
        let output    = LinearConfig::new(self.hidden_size, self.vocab_size).init(device);
        CharRnn { embedding, lstm, output }
    }
}

/// Embedding → single-layer LSTM → linear projection to vocabulary logits.
#[derive(Module, Debug)]
pub struct CharRnn<B: Backend> {
    pub embedding: Embedding<B>,
    pub lstm:      Lstm<B>,
    pub output:    Linear<B>,
}

/// Result of one forward pass against known targets.
pub struct CharRnnOutput<B: Backend> {
    /// Mean cross-entropy over every position of every window — shape [1]
    pub loss:    Tensor<B, 1>,
    /// Unnormalised scores — shape [batch, seq_len, vocab]
    pub logits:  Tensor<B, 3>,
    /// Next-character indices — shape [batch, seq_len]
    pub targets: Tensor<B, 2, Int>,
}

impl<B: Backend> CharRnn<B> {
    /// inputs: [batch, seq_len] → logits: [batch, seq_len, vocab]
    ///
    /// The LSTM starts from a zero state on every call; nothing is
    /// carried between windows or batches.
    pub fn forward(&self, inputs: Tensor<B, 2, Int>) -> Tensor<B, 3> {
        let embedded    = self.embedding.forward(inputs);
        let (hidden, _) = self.lstm.forward(embedded, None);
        self.output.forward(hidden)
    }

    pub fn forward_step(
        &self,
        inputs:  Tensor<B, 2, Int>,
        targets: Tensor<B, 2, Int>,
    ) -> CharRnnOutput<B> {
        let logits = self.forward(inputs);
        let [batch_size, seq_len, vocab_size] = logits.dims();

        // Flatten positions so every (window, position) is one CE sample.
        let ce   = CrossEntropyLossConfig::new().init(&logits.device());
        let loss = ce.forward(
            logits.clone().reshape([batch_size * seq_len, vocab_size]),
            targets.clone().reshape([batch_size * seq_len]),
        );

        CharRnnOutput { loss, logits, targets }
    }

    pub fn vocab_size(&self) -> usize {
        self.embedding.weight.val().dims()[0]
    }
}

impl<B: Backend> CharRnnOutput<B> {
    /// Number of predicted positions in the batch
    pub fn num_tokens(&self) -> usize {
        self.targets.dims().iter().product()
    }

    /// Positions where argmax(logits) equals the target
    pub fn num_correct(&self) -> usize {
        let [batch_size, seq_len] = self.targets.dims();
        let predicted = self.logits.clone().argmax(2).reshape([batch_size, seq_len]);
        let correct: i64 = predicted
            .equal(self.targets.clone())
            .int()
            .sum()
            .into_scalar()
            .elem::<i64>();
        correct as usize
    }

    pub fn loss_value(&self) -> f64 {
        self.loss.clone().into_scalar().elem::<f64>()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use burn::backend::NdArray;

    type TestBackend = NdArray;

    fn ints(values: &[i32], shape: [usize; 2]) -> Tensor<TestBackend, 2, Int> {
        Tensor::<TestBackend, 1, Int>::from_ints(values, &Default::default()).reshape(shape)
    }

    #[test]
    fn test_forward_shape() {
        let model: CharRnn<TestBackend> = CharRnnConfig::new(7)
            .with_hidden_size(16)
            .init(&Default::default());

        let logits = model.forward(ints(&[0, 1, 2, 3, 4, 5, 6, 0, 1, 2], [2, 5]));
        assert_eq!(logits.dims(), [2, 5, 7]);
        assert_eq!(model.vocab_size(), 7);
    }

    #[test]
    fn test_no_state_carried_between_calls() {
        let model: CharRnn<TestBackend> = CharRnnConfig::new(5)
            .with_hidden_size(8)
            .init(&Default::default());

        let first  = model.forward(ints(&[1, 2, 3], [1, 3]));
        let _noise = model.forward(ints(&[4, 4, 4], [1, 3]));
        let second = model.forward(ints(&[1, 2, 3], [1, 3]));

        first.into_data().assert_approx_eq(&second.into_data(), 5);
    }

    #[test]
    fn test_positions_only_see_their_past() {
        let model: CharRnn<TestBackend> = CharRnnConfig::new(6)
            .with_hidden_size(8)
            .init(&Default::default());

        // Same prefix, different last token: the first two positions must agree.
        let a = model.forward(ints(&[1, 2, 3], [1, 3])).slice([0..1, 0..2, 0..6]);
        let b = model.forward(ints(&[1, 2, 5], [1, 3])).slice([0..1, 0..2, 0..6]);

        a.into_data().assert_approx_eq(&b.into_data(), 5);
    }

    #[test]
    fn test_initial_loss_near_uniform() {
        let vocab = 10;
        let model: CharRnn<TestBackend> = CharRnnConfig::new(vocab)
            .with_hidden_size(16)
            .init(&Default::default());

        let output = model.forward_step(
            ints(&[0, 1, 2, 3, 4, 5, 6, 7], [2, 4]),
            ints(&[1, 2, 3, 4, 5, 6, 7, 8], [2, 4]),
        );

        let loss = output.loss_value();
        assert!(loss.is_finite());
        // Small random weights keep the prediction close to uniform: ln(10) ≈ 2.30
        assert!((loss - (vocab as f64).ln()).abs() < 1.0, "loss = {loss}");
        assert_eq!(output.num_tokens(), 8);
        assert!(output.num_correct() <= 8);
    }
}
