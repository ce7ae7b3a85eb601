//! Device capability types - permissions, captured assets, positions

/// OS-level permission a flow must obtain before it proceeds
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DevicePermission {
    Camera,
    MediaLibrary,
    Location,
}

impl DevicePermission {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Camera => "camera",
            Self::MediaLibrary => "media library",
            Self::Location => "location",
        }
    }
}

impl std::fmt::Display for DevicePermission {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Answer to a permission prompt
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PermissionStatus {
    Granted,
    Denied,
}

impl PermissionStatus {
    #[inline]
    pub fn is_granted(&self) -> bool {
        matches!(self, Self::Granted)
    }
}

/// Where a picked asset comes from
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CaptureSource {
    /// Take a new photo
    Camera,
    /// Pick an image from the media library
    Library,
    /// Pick any document
    Documents,
}

impl CaptureSource {
    /// Permission the picker needs
    pub fn permission(&self) -> DevicePermission {
        match self {
            Self::Camera => DevicePermission::Camera,
            Self::Library | Self::Documents => DevicePermission::MediaLibrary,
        }
    }
}

/// Raw picker output
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AssetData {
    /// Base64-encoded bytes returned inline by the picker
    Inline(String),
    /// Local URI that must be read before upload
    LocalUri(String),
}

/// Asset returned by a device picker
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CapturedAsset {
    pub data: AssetData,
    pub file_name: Option<String>,
    pub mime_type: Option<String>,
}

impl CapturedAsset {
    /// Asset with inline base64 data
    pub fn inline(base64: impl Into<String>) -> Self {
        Self {
            data: AssetData::Inline(base64.into()),
            file_name: None,
            mime_type: None,
        }
    }

    /// Asset referenced by a local URI
    pub fn local(uri: impl Into<String>) -> Self {
        Self {
            data: AssetData::LocalUri(uri.into()),
            file_name: None,
            mime_type: None,
        }
    }

    pub fn with_file_name(mut self, name: impl Into<String>) -> Self {
        self.file_name = Some(name.into());
        self
    }

    pub fn with_mime_type(mut self, mime: impl Into<String>) -> Self {
        self.mime_type = Some(mime.into());
        self
    }
}

/// Geolocation fix
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GeoPosition {
    pub latitude: f64,
    pub longitude: f64,
}
