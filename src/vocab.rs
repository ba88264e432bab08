/// Reserved token ids shared by every bucket data file.
pub const PAD_ID: u32 = 0;
pub const GO_ID: u32 = 1;
pub const EOS_ID: u32 = 2;
pub const UNK_ID: u32 = 3;

/// Mapping between text and token-id sequences, owned by an external
/// collaborator. Ids below `UNK_ID + 1` are reserved and must not be
/// produced by `encode`.
pub trait Vocabulary {
    fn encode(&self, text: &str) -> Vec<u32>;

    fn decode(&self, ids: &[u32]) -> String;
}
