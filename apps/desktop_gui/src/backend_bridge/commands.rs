//! Backend commands queued from UI to backend worker.

use std::path::PathBuf;

use client_core::SelectedImage;
use shared::domain::{AnimationResult, UploadedImages};

pub enum BackendCommand {
    SetServer {
        server_url: String,
    },
    Search {
        generation: u64,
    },
    Upload {
        files: Vec<SelectedImage>,
    },
    Animate {
        images: UploadedImages,
    },
    SaveAnimation {
        animation: AnimationResult,
        download_dir: Option<PathBuf>,
    },
}

impl BackendCommand {
    pub fn name(&self) -> &'static str {
        match self {
            Self::SetServer { .. } => "set_server",
            Self::Search { .. } => "search",
            Self::Upload { .. } => "upload",
            Self::Animate { .. } => "animate",
            Self::SaveAnimation { .. } => "save_animation",
        }
    }
}
