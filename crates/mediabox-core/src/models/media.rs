use bytes::Bytes;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

#[cfg(feature = "sqlx")]
use sqlx::FromRow;

/// Metadata record shadowing one object in storage.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "sqlx", derive(FromRow))]
pub struct Media {
    pub id: Uuid,
    pub key: String,
    pub url: String,
    pub content_type: String,
    pub size: i64,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Location of an object written by a single upload.
///
/// Key and URL only ever travel together so a record can never point at one
/// object's key and another object's URL.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoredObject {
    pub key: String,
    pub url: String,
}

/// Field values for inserting or replacing a media record.
#[derive(Debug, Clone)]
pub struct NewMedia {
    pub object: StoredObject,
    pub content_type: String,
    pub size: i64,
}

impl NewMedia {
    pub fn new(object: StoredObject, content_type: impl Into<String>, size: usize) -> Self {
        Self {
            object,
            content_type: content_type.into(),
            size: size as i64,
        }
    }
}

/// A file received from a client, independent of the transport it came in on.
#[derive(Debug, Clone)]
pub struct UploadedFile {
    pub original_name: String,
    pub content_type: String,
    pub data: Bytes,
}

impl UploadedFile {
    pub fn new(
        original_name: impl Into<String>,
        content_type: impl Into<String>,
        data: impl Into<Bytes>,
    ) -> Self {
        Self {
            original_name: original_name.into(),
            content_type: content_type.into(),
            data: data.into(),
        }
    }

    pub fn size(&self) -> usize {
        self.data.len()
    }
}

/// Media record as returned by the API
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct MediaResponse {
    #[schema(example = "0f8fad5b-d9cb-469f-a165-70867728950e")]
    pub id: Uuid,
    #[schema(example = "production/others/0f8fad5b-d9cb-469f-a165-70867728950e-photo.jpg")]
    pub key: String,
    #[schema(
        example = "https://media.s3.eu-west-1.amazonaws.com/production/others/0f8fad5b-d9cb-469f-a165-70867728950e-photo.jpg"
    )]
    pub url: String,
    /// MIME type reported by the client
    #[serde(rename = "type")]
    #[schema(example = "image/jpeg")]
    pub content_type: String,
    #[schema(example = 102400)]
    pub size: i64,
}

impl From<Media> for MediaResponse {
    fn from(media: Media) -> Self {
        Self {
            id: media.id,
            key: media.key,
            url: media.url,
            content_type: media.content_type,
            size: media.size,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn response_serializes_mime_type_as_type() {
        let now = Utc::now();
        let media = Media {
            id: Uuid::new_v4(),
            key: "test/others/a-photo.jpg".to_string(),
            url: "https://cdn.example.com/test/others/a-photo.jpg".to_string(),
            content_type: "image/jpeg".to_string(),
            size: 102400,
            created_at: now,
            updated_at: now,
        };

        let json = serde_json::to_value(MediaResponse::from(media.clone())).unwrap();
        assert_eq!(json["type"], "image/jpeg");
        assert_eq!(json["size"], 102400);
        assert_eq!(json["key"], media.key.as_str());
        assert!(json.get("content_type").is_none());
        assert!(json.get("created_at").is_none());
    }

    #[test]
    fn new_media_carries_object_and_size() {
        let object = StoredObject {
            key: "dev/avatars/x-a.png".to_string(),
            url: "http://localhost/files/dev/avatars/x-a.png".to_string(),
        };
        let new = NewMedia::new(object.clone(), "image/png", 42);
        assert_eq!(new.object, object);
        assert_eq!(new.size, 42);
    }

    #[test]
    fn uploaded_file_size_is_payload_length() {
        let file = UploadedFile::new("notes.txt", "text/plain", b"hello".to_vec());
        assert_eq!(file.size(), 5);
    }
}
