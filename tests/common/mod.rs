#![allow(dead_code)]

use std::cell::Cell;
use std::fs;
use std::path::Path;

use anyhow::{Result, anyhow};
use seq2seq_buckets::{Batch, EOS_ID, PAD_ID, SequenceModel, StepOutput, Vocabulary};

const CHAR_BASE: u32 = 4;

/// Vocabulary double mapping each character to a fixed id above the
/// reserved range.
pub struct CharVocab;

impl Vocabulary for CharVocab {
    fn encode(&self, text: &str) -> Vec<u32> {
        text.chars().map(|c| c as u32 + CHAR_BASE).collect()
    }

    fn decode(&self, ids: &[u32]) -> String {
        ids.iter()
            .take_while(|&&id| id != EOS_ID)
            .filter(|&&id| id >= CHAR_BASE)
            .filter_map(|&id| char::from_u32(id - CHAR_BASE))
            .collect()
    }
}

/// Model double that replays each encoder input as its prediction.
///
/// The encoder side arrives reversed and left-padded; the echo
/// reconstructs the original order, strips padding, and emits one-hot
/// logits for each token followed by the end-of-sequence marker. Also
/// doubles as a step counter for loop tests.
pub struct EchoModel {
    pub vocab_size: usize,
    pub steps: usize,
    pub loss: f32,
    pub saves: Cell<usize>,
}

impl EchoModel {
    pub fn new(vocab_size: usize) -> Self {
        Self {
            vocab_size,
            steps: 0,
            loss: 1.0,
            saves: Cell::new(0),
        }
    }
}

impl SequenceModel for EchoModel {
    fn step(&mut self, batch: &Batch, _bucket_id: usize, _forward_only: bool) -> Result<StepOutput> {
        self.steps += 1;

        let members = batch.size();
        let output_len = batch.decoder_inputs.len();
        let mut logits = vec![vec![vec![0.0f32; self.vocab_size]; members]; output_len];

        for member in 0..members {
            let tokens: Vec<u32> = batch
                .encoder_inputs
                .iter()
                .rev()
                .map(|step| step[member])
                .filter(|&id| id != PAD_ID)
                .collect();
            for step in 0..output_len {
                let id = tokens.get(step).copied().unwrap_or(EOS_ID);
                logits[step][member][id as usize] = 1.0;
            }
        }

        Ok(StepOutput {
            gradient_norm: None,
            loss: Some(self.loss),
            logits,
        })
    }

    fn save(&self, path: &Path) -> Result<()> {
        self.saves.set(self.saves.get() + 1);
        fs::write(path, b"checkpoint").map_err(|err| anyhow!(err))
    }

    fn restore(&mut self, path: &Path) -> Result<()> {
        if path.is_file() {
            Ok(())
        } else {
            Err(anyhow!("missing checkpoint {}", path.display()))
        }
    }
}
