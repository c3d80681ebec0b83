// src/features.rs
//
// Character-bigram featurizer. Independent of the engine: it only produces
// the timestep vectors a model consumes. The vocabulary file is one bigram
// per line (first tab-separated field), with the line order assigning ids.

use std::collections::HashMap;
use std::fs::File;
use std::io::Read;
use std::path::Path;

use ndarray::Array1;

#[derive(Debug)]
pub struct BigramVocab {
    index: HashMap<String, usize>,
}

impl BigramVocab {
    pub fn parse(contents: &str) -> Self {
        let mut index: HashMap<String, usize> = HashMap::new();
        for line in contents.lines() {
            if line.is_empty() {
                continue;
            }
            let bigram = line.split('\t').next().unwrap_or("");
            if bigram.is_empty() {
                continue;
            }
            let next_id = index.len();
            index.entry(bigram.to_string()).or_insert(next_id);
        }
        Self { index }
    }

    pub fn load(path: &str) -> Result<Self, Box<dyn std::error::Error>> {
        if !Path::new(path).exists() {
            return Err(format!("Bigram file not found at: {}", path).into());
        }
        let mut file = File::open(path)
            .map_err(|e| format!("Failed to open bigram file {}: {}", path, e))?;
        let mut contents = String::new();
        file.read_to_string(&mut contents)
            .map_err(|e| format!("Failed to read bigram file {}: {}", path, e))?;
        Ok(Self::parse(&contents))
    }

    pub fn len(&self) -> usize {
        self.index.len()
    }

    pub fn is_empty(&self) -> bool {
        self.index.is_empty()
    }

    /// One timestep vector per whitespace-separated word: the word is
    /// padded with '#' on both ends and every known bigram increments its
    /// slot. Words whose bigrams are all unknown produce no vector.
    pub fn featurize(&self, text: &str) -> Vec<Array1<f32>> {
        let mut sequence = Vec::new();
        for word in text.split_whitespace() {
            let padded: Vec<char> = format!("#{}#", word).chars().collect();
            let mut v = Array1::<f32>::zeros(self.index.len());
            let mut hit = false;
            for pair in padded.windows(2) {
                let bigram: String = pair.iter().collect();
                if let Some(&id) = self.index.get(&bigram) {
                    v[id] += 1.0;
                    hit = true;
                }
            }
            if hit {
                sequence.push(v);
            }
        }
        sequence
    }
}
