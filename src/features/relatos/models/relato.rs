use chrono::{DateTime, Utc};
use sqlx::FromRow;
use uuid::Uuid;

/// Database model for a citizen report
#[derive(Debug, Clone, FromRow)]
pub struct Relato {
    pub id: Uuid,
    pub titulo: String,
    pub descricao: String,
    pub endereco: String,
    pub categoria: String,
    pub data_criacao: DateTime<Utc>,
}

/// Database model for a photo owned by a relato.
///
/// A foto row exists iff its upload to the object store succeeded; rows are
/// only ever written inside the same transaction as their owning relato.
#[derive(Debug, Clone, FromRow)]
#[allow(dead_code)]
pub struct Foto {
    pub id: Uuid,
    pub relato_id: Uuid,
    pub url: String,
}

/// Data for creating a new relato
#[derive(Debug)]
pub struct CreateRelato {
    pub titulo: String,
    pub descricao: String,
    pub endereco: String,
    pub categoria: String,
    /// Raw photo payloads in submission order; empty/null entries are skipped
    pub fotos: Vec<Option<String>>,
}

/// A relato joined with the URLs of its uploaded photos.
/// `fotos` is empty, never absent, for photo-less relatos.
#[derive(Debug, Clone)]
pub struct RelatoWithFotos {
    pub relato: Relato,
    pub fotos: Vec<String>,
}
