use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

use crate::features::relatos::models::{CreateRelato, RelatoWithFotos};

/// Request DTO for submitting a relato.
///
/// Field names are the Portuguese wire contract consumed by the frontend.
/// Each `fotos` entry is a base64-encoded image (optionally data-URI
/// prefixed), an empty string, or null; empty/null entries are skipped.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct CreateRelatoDto {
    pub titulo: String,
    pub descricao: String,
    pub endereco: String,
    pub categoria: String,
    pub fotos: Vec<Option<String>>,
}

impl From<CreateRelatoDto> for CreateRelato {
    fn from(dto: CreateRelatoDto) -> Self {
        Self {
            titulo: dto.titulo,
            descricao: dto.descricao,
            endereco: dto.endereco,
            categoria: dto.categoria,
            fotos: dto.fotos,
        }
    }
}

/// Response DTO after a successful submission
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct CreateRelatoResponseDto {
    pub mensagem: String,
    pub id: Uuid,
}

/// Response DTO for a listed relato with its photo URLs
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct RelatoResponseDto {
    pub id: Uuid,
    pub titulo: String,
    pub descricao: String,
    pub endereco: String,
    pub categoria: String,
    pub data_criacao: DateTime<Utc>,
    pub fotos: Vec<String>,
}

impl From<RelatoWithFotos> for RelatoResponseDto {
    fn from(r: RelatoWithFotos) -> Self {
        Self {
            id: r.relato.id,
            titulo: r.relato.titulo,
            descricao: r.relato.descricao,
            endereco: r.relato.endereco,
            categoria: r.relato.categoria,
            data_criacao: r.relato.data_criacao,
            fotos: r.fotos,
        }
    }
}

/// Fixed payload for the liveness probe
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct TestStatusDto {
    pub status: String,
    pub message: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn create_dto_parses_documented_body() {
        let body = serde_json::json!({
            "titulo": "Buraco na rua",
            "descricao": "Buraco grande na pista",
            "endereco": "Av. Paulista, 1000",
            "categoria": "infraestrutura",
            "fotos": ["aGVsbG8=", "", null]
        });

        let dto: CreateRelatoDto = serde_json::from_value(body).unwrap();
        assert_eq!(dto.titulo, "Buraco na rua");
        assert_eq!(dto.fotos.len(), 3);
        assert_eq!(dto.fotos[0].as_deref(), Some("aGVsbG8="));
        assert_eq!(dto.fotos[1].as_deref(), Some(""));
        assert_eq!(dto.fotos[2], None);
    }

    #[test]
    fn create_dto_rejects_missing_field() {
        let body = serde_json::json!({
            "titulo": "t",
            "descricao": "d",
            "endereco": "e",
            "fotos": []
        });
        assert!(serde_json::from_value::<CreateRelatoDto>(body).is_err());
    }

    #[test]
    fn response_dto_serializes_wire_fields() {
        use crate::features::relatos::models::Relato;
        use chrono::Utc;

        let dto = RelatoResponseDto::from(RelatoWithFotos {
            relato: Relato {
                id: Uuid::new_v4(),
                titulo: "t".into(),
                descricao: "d".into(),
                endereco: "e".into(),
                categoria: "c".into(),
                data_criacao: Utc::now(),
            },
            fotos: vec![],
        });

        let value = serde_json::to_value(&dto).unwrap();
        for key in ["id", "titulo", "descricao", "endereco", "categoria", "data_criacao", "fotos"] {
            assert!(value.get(key).is_some(), "missing wire field {}", key);
        }
        // Zero photos serialize as an empty array, never null
        assert!(value["fotos"].as_array().unwrap().is_empty());
    }
}
