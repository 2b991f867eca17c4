//! Named resource files (corpora, serialized models) kept in a local folder.
//!
//! Resources are registered by name with the URL they can be downloaded
//! from. Due never downloads them itself: a lookup of a missing file fails
//! and logs where to get it.

use std::collections::HashMap;
use std::fs::File;
use std::io::{Cursor, Read};
use std::path::{Path, PathBuf};

use due_types::error::ResourceError;
use due_types::resource::ResourceRecord;
use tracing::{debug, error, warn};
use zip::ZipArchive;
use zip::result::ZipError;

use crate::filesystem::expand_home;

/// Default location of the resource folder.
pub const DEFAULT_RESOURCE_FOLDER: &str = "~/.due/resources";

/// Registry of named resources backed by a folder on disk.
#[derive(Debug)]
pub struct ResourceManager {
    folder: PathBuf,
    resources: HashMap<String, ResourceRecord>,
    /// filename -> owning resource name
    filenames: HashMap<String, String>,
}

impl ResourceManager {
    /// Open the resource folder, creating it if needed. A leading `~` is
    /// expanded to the home directory.
    pub fn new(folder: impl AsRef<Path>) -> Result<Self, ResourceError> {
        let folder = expand_home(folder.as_ref());
        std::fs::create_dir_all(&folder)?;
        debug!(folder = %folder.display(), "opened resource folder");
        Ok(Self {
            folder,
            resources: HashMap::new(),
            filenames: HashMap::new(),
        })
    }

    pub fn folder(&self) -> &Path {
        &self.folder
    }

    /// Register a resource. Names and filenames must both be unique.
    pub fn register(&mut self, record: ResourceRecord) -> Result<(), ResourceError> {
        if self.resources.contains_key(&record.name) {
            error!(name = %record.name, "resource already registered");
            return Err(ResourceError::AlreadyRegistered(record.name));
        }
        if let Some(existing) = self.filenames.get(&record.filename) {
            error!(name = %record.name, filename = %record.filename, %existing, "resource filename already in use");
            return Err(ResourceError::FilenameTaken {
                filename: record.filename,
                existing: existing.clone(),
            });
        }

        debug!(name = %record.name, filename = %record.filename, "registered resource");
        self.filenames.insert(record.filename.clone(), record.name.clone());
        self.resources.insert(record.name.clone(), record);
        Ok(())
    }

    /// Register a resource from its parts.
    pub fn register_resource(
        &mut self,
        name: impl Into<String>,
        description: impl Into<String>,
        url: impl Into<String>,
        filename: impl Into<String>,
    ) -> Result<(), ResourceError> {
        self.register(ResourceRecord {
            name: name.into(),
            description: description.into(),
            url: url.into(),
            filename: filename.into(),
        })
    }

    pub fn get(&self, name: &str) -> Option<&ResourceRecord> {
        self.resources.get(name)
    }

    /// All registered resources, sorted by name.
    pub fn records(&self) -> Vec<&ResourceRecord> {
        let mut records: Vec<_> = self.resources.values().collect();
        records.sort_by(|a, b| a.name.cmp(&b.name));
        records
    }

    /// Where the file of resource `name` is expected to be.
    pub fn resource_path(&self, name: &str) -> Result<PathBuf, ResourceError> {
        self.resources
            .get(name)
            .map(|record| self.folder.join(&record.filename))
            .ok_or_else(|| ResourceError::Unregistered(name.to_string()))
    }

    /// Whether resource `name` is registered and its file is present.
    pub fn is_available(&self, name: &str) -> bool {
        self.resource_path(name).is_ok_and(|path| path.is_file())
    }

    /// Open the file of resource `name` for reading.
    pub fn open(&self, name: &str) -> Result<File, ResourceError> {
        let path = self.existing_path(name)?;
        Ok(File::open(path)?)
    }

    /// Read the file of resource `name` as UTF-8 text.
    pub fn read_to_string(&self, name: &str) -> Result<String, ResourceError> {
        let path = self.existing_path(name)?;
        Ok(std::fs::read_to_string(path)?)
    }

    /// Read member `filename` out of resource `name`, which must be a ZIP
    /// archive.
    pub fn open_resource_file(&self, name: &str, filename: &str) -> Result<Cursor<Vec<u8>>, ResourceError> {
        let archive = self.open(name)?;
        let mut archive = ZipArchive::new(archive).map_err(|e| match e {
            ZipError::Io(io) => ResourceError::Io(io),
            other => ResourceError::UnsupportedFormat {
                name: name.to_string(),
                reason: other.to_string(),
            },
        })?;

        let mut member = archive.by_name(filename).map_err(|e| match e {
            ZipError::FileNotFound => ResourceError::MemberNotFound {
                name: name.to_string(),
                filename: filename.to_string(),
            },
            ZipError::Io(io) => ResourceError::Io(io),
            other => ResourceError::UnsupportedFormat {
                name: name.to_string(),
                reason: other.to_string(),
            },
        })?;
        let mut content = Vec::with_capacity(usize::try_from(member.size()).unwrap_or_default());
        member.read_to_end(&mut content)?;
        debug!(name, filename, bytes = content.len(), "read resource member");
        Ok(Cursor::new(content))
    }

    fn existing_path(&self, name: &str) -> Result<PathBuf, ResourceError> {
        let path = self.resource_path(name)?;
        if path.is_file() {
            return Ok(path);
        }

        let (url, filename) = self
            .resources
            .get(name)
            .map(|record| (record.url.clone(), record.filename.clone()))
            .unwrap_or_default();
        warn!(
            "Couldn't find resource '{name}'. Download the file at {url} and copy it in your \
             resource folder ({}) with name '{filename}' to make it available in Due.",
            self.folder.display()
        );
        Err(ResourceError::Missing {
            name: name.to_string(),
            url,
            path: path.display().to_string(),
        })
    }
}
