use std::path::{Path, PathBuf};

use serde::{Deserialize, Deserializer};

/// Backend identifiers arrive as numbers from some endpoints and strings from
/// others. The form only ever echoes them back as text.
fn id_as_string<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum RawId {
        Number(i64),
        Text(String),
    }

    Ok(match RawId::deserialize(deserializer)? {
        RawId::Number(n) => n.to_string(),
        RawId::Text(s) => s,
    })
}

fn optional_id_as_string<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    struct Wrapper(#[serde(deserialize_with = "id_as_string")] String);

    Ok(Option::<Wrapper>::deserialize(deserializer)?.map(|Wrapper(id)| id))
}

/// A dish record as served by `GET pratos/{id}/`. Decoded in full, but the
/// form only reads the name.
#[allow(dead_code)]
#[derive(Debug, Clone, Default, Deserialize, PartialEq, Eq)]
pub struct Dish {
    #[serde(default, deserialize_with = "optional_id_as_string")]
    pub id: Option<String>,
    #[serde(rename = "nome")]
    pub name: String,
    #[serde(rename = "descricao", default)]
    pub description: Option<String>,
    #[serde(default)]
    pub tag: Option<String>,
    #[serde(
        rename = "restaurante",
        default,
        deserialize_with = "optional_id_as_string"
    )]
    pub restaurant: Option<String>,
    #[serde(rename = "imagem", default)]
    pub image: Option<String>,
}

#[derive(Debug, Clone, Deserialize, PartialEq, Eq)]
pub struct Tag {
    #[allow(dead_code)]
    #[serde(deserialize_with = "id_as_string")]
    pub id: String,
    pub value: String,
}

/// `GET tags/` wraps the list in an object.
#[derive(Debug, Clone, Deserialize)]
pub struct TagList {
    pub tags: Vec<Tag>,
}

#[derive(Debug, Clone, Deserialize, PartialEq, Eq)]
pub struct Restaurant {
    #[serde(deserialize_with = "id_as_string")]
    pub id: String,
    #[serde(rename = "nome")]
    pub name: String,
}

/// A local file chosen for upload. Contents are read when the request body
/// is assembled, not at selection time.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImageFile {
    pub path: PathBuf,
    pub file_name: String,
}

impl ImageFile {
    pub fn from_path(path: impl Into<PathBuf>) -> Self {
        let path = path.into();
        let file_name = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| path.display().to_string());
        Self { path, file_name }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn mime_type(&self) -> String {
        mime_guess::from_path(&self.path)
            .first_or_octet_stream()
            .essence_str()
            .to_string()
    }
}

/// Multipart field names expected by the backend.
pub const FIELD_NAME: &str = "nome";
pub const FIELD_DESCRIPTION: &str = "descricao";
pub const FIELD_TAG: &str = "tag";
pub const FIELD_RESTAURANT: &str = "restaurante";
pub const FIELD_IMAGE: &str = "imagem";

/// Snapshot of the form taken at submit time.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DishPayload {
    pub name: String,
    pub description: String,
    pub tag: String,
    pub restaurant: String,
    pub image: Option<ImageFile>,
}

impl DishPayload {
    /// Text parts in the order they are appended to the multipart body.
    pub fn text_fields(&self) -> [(&'static str, &str); 4] {
        [
            (FIELD_NAME, self.name.as_str()),
            (FIELD_DESCRIPTION, self.description.as_str()),
            (FIELD_TAG, self.tag.as_str()),
            (FIELD_RESTAURANT, self.restaurant.as_str()),
        ]
    }
}
