use lanyard::core::{LanyardError, Result};

/// What the fetched card model contains.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ModelSummary {
    pub meshes: usize,
    pub nodes: usize,
    pub blob_len: usize,
}

/// Parses a binary glTF and summarises it. Plain JSON glTF is rejected because
/// the card ships as a single `.glb`.
pub fn inspect_card_model(bytes: &[u8]) -> Result<ModelSummary> {
    let file = gltf::Gltf::from_slice(bytes).map_err(|err| LanyardError::AssetLoad(format!("card model: {err}")))?;
    let blob = file
        .blob
        .as_deref()
        .ok_or_else(|| LanyardError::AssetLoad("card model is not a binary glTF".into()))?;

    Ok(ModelSummary {
        meshes: file.meshes().len(),
        nodes: file.nodes().len(),
        blob_len: blob.len(),
    })
}

/// Load progress of one remote asset.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum AssetState {
    #[default]
    Pending,
    Ready,
    Failed(String),
}

impl AssetState {
    pub fn from_result<T>(result: &Result<T>) -> Self {
        match result {
            Ok(_) => AssetState::Ready,
            Err(err) => AssetState::Failed(err.to_string()),
        }
    }

    pub fn is_ready(&self) -> bool {
        matches!(self, AssetState::Ready)
    }
}
