// Copyright (c) 2025 Varshith Gudur. Licensed under AGPLv3.
use paystream_kernel::state::QuarterTracker;
use serde::{Deserialize, Serialize};
use std::fs::File;
use std::io::Write;
use std::path::Path;

use crate::errors::EngineError;

const SCHEMA_VERSION: u32 = 1;

#[derive(Serialize, Deserialize, Debug)]
#[serde(rename_all = "camelCase")]
struct QuarterFile {
    version: u32,
    saved_at: u64,
    tracker: QuarterTracker,
}

/// Quarter baselines on disk, one JSON document per account.
pub struct QuarterStore;

impl QuarterStore {
    /// Writes to a temp file then renames over `path`, so readers see the old file or the new one.
    pub fn save(path: &Path, tracker: &QuarterTracker, saved_at: u64) -> Result<(), EngineError> {
        let tmp_path = path.with_extension("tmp");
        let body = serde_json::to_vec_pretty(&QuarterFile {
            version: SCHEMA_VERSION,
            saved_at,
            tracker: tracker.clone(),
        })
        .map_err(|e| EngineError::Internal(e.to_string()))?;

        {
            let mut file = File::create(&tmp_path)?;
            file.write_all(&body)?;
            file.sync_all()?;
        }

        std::fs::rename(&tmp_path, path)?;
        Ok(())
    }

    /// `Ok(None)` when nothing was saved yet.
    pub fn load(path: &Path) -> Result<Option<QuarterTracker>, EngineError> {
        let data = match std::fs::read(path) {
            Ok(data) => data,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(None),
            Err(e) => return Err(e.into()),
        };

        let file: QuarterFile = serde_json::from_slice(&data)
            .map_err(|e| EngineError::InvalidInput(format!("Corrupt quarter state {}: {e}", path.display())))?;
        if file.version != SCHEMA_VERSION {
            return Err(EngineError::InvalidInput(format!(
                "Quarter state version {} not supported",
                file.version
            )));
        }
        Ok(Some(file.tracker))
    }
}
