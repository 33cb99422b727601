//! The on-disk structured JSON document for a [`crate::Table`].

use serde::{Deserialize, Serialize};

use crate::info::FileInfo;
use crate::marks::FileMarks;

#[derive(Serialize, Deserialize)]
pub(crate) struct TableDocument {
    pub(crate) description: String,
    pub(crate) files: Vec<FileRecord>,
}

#[derive(Serialize, Deserialize)]
pub(crate) struct FileRecord {
    pub(crate) name: String,
    pub(crate) protocol_path: ProtocolPathRecord,
    pub(crate) marks: MarksRecord,
}

#[derive(Serialize, Deserialize)]
pub(crate) struct ProtocolPathRecord {
    pub(crate) path: String,
    pub(crate) pid: String,
}

#[derive(Serialize, Deserialize)]
pub(crate) struct MarksRecord {
    pub(crate) tmstp: f64,
    pub(crate) fid: String,
}

pub(crate) fn protocol_id(path: &str) -> &'static str {
    let classified = protocol::classify(path);
    if classified.is_ssh() {
        "ssh"
    } else if classified.is_xrootd() {
        "xrootd"
    } else {
        "local"
    }
}

impl FileRecord {
    pub(crate) fn from_info(info: &FileInfo) -> Self {
        Self {
            name: info.name().to_string(),
            protocol_path: ProtocolPathRecord {
                path: info.path().to_string(),
                pid: protocol_id(info.path()).to_string(),
            },
            marks: MarksRecord {
                tmstp: info.marks().timestamp(),
                fid: info.marks().fingerprint().to_string(),
            },
        }
    }

    pub(crate) fn into_info(self) -> Result<FileInfo, crate::error::TableError> {
        let marks = FileMarks::new(self.marks.tmstp, self.marks.fid)
            .map_err(|err| crate::error::TableError::Format {
                path: self.name.clone(),
                reason: err.to_string(),
            })?;
        FileInfo::from_fields(self.name, self.protocol_path.path, marks).map_err(|err| {
            crate::error::TableError::Format {
                path: String::new(),
                reason: err.to_string(),
            }
        })
    }
}
