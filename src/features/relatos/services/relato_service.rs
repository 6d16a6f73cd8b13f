use std::sync::Arc;

use chrono::Utc;
use sqlx::PgPool;
use uuid::Uuid;

use crate::core::error::Result;
use crate::features::relatos::models::{CreateRelato, Foto, Relato, RelatoWithFotos};
use crate::modules::image::decode_base64_image;
use crate::modules::storage::BlobClient;

/// Fixed window size for the recent-reports listing
const RECENT_WINDOW: i64 = 4;

/// Service for relato submission and listing.
///
/// Owns the submission pipeline: decode and upload every photo first, then
/// persist the relato and its foto rows in one short-lived transaction. The
/// transaction never spans a network call to the object store.
pub struct RelatoService {
    pool: PgPool,
    storage: Arc<BlobClient>,
}

impl RelatoService {
    pub fn new(pool: PgPool, storage: Arc<BlobClient>) -> Self {
        Self { pool, storage }
    }

    /// Create a relato with its photos.
    ///
    /// Photos are processed sequentially in submission order; the first
    /// decode or upload failure aborts the whole submission before any row
    /// is written. Empty or null entries are skipped silently. A foto row is
    /// recorded only for uploads that succeeded, and all rows commit
    /// atomically with the relato or not at all.
    ///
    /// Uploads that succeed before a later failure leave orphaned objects in
    /// the bucket; there is no compensating delete.
    pub async fn create(&self, data: CreateRelato) -> Result<Uuid> {
        let mut foto_urls: Vec<String> = Vec::new();

        for payload in data.fotos.iter().flatten() {
            if payload.trim().is_empty() {
                continue;
            }

            let bytes = decode_base64_image(payload)?;
            let name = format!("{}.jpg", Uuid::new_v4());
            let url = self.storage.upload_image(&name, bytes).await?;

            tracing::debug!("Photo uploaded: {}", url);
            foto_urls.push(url);
        }

        let relato_id = Uuid::new_v4();
        let mut tx = self.pool.begin().await?;

        sqlx::query(
            r#"
            INSERT INTO relatos (id, titulo, descricao, endereco, categoria, data_criacao)
            VALUES ($1, $2, $3, $4, $5, $6)
            "#,
        )
        .bind(relato_id)
        .bind(&data.titulo)
        .bind(&data.descricao)
        .bind(&data.endereco)
        .bind(&data.categoria)
        .bind(Utc::now())
        .execute(&mut *tx)
        .await?;

        for url in &foto_urls {
            sqlx::query(
                r#"
                INSERT INTO fotos (id, relato_id, url)
                VALUES ($1, $2, $3)
                "#,
            )
            .bind(Uuid::new_v4())
            .bind(relato_id)
            .bind(url)
            .execute(&mut *tx)
            .await?;
        }

        // Dropped without commit on any earlier error path, rolling back
        tx.commit().await?;

        tracing::info!(
            "Created relato {} with {} photo(s)",
            relato_id,
            foto_urls.len()
        );

        Ok(relato_id)
    }

    /// List the most recent relatos, newest first, each with its photo URLs.
    pub async fn list_recent(&self) -> Result<Vec<RelatoWithFotos>> {
        let relatos: Vec<Relato> = sqlx::query_as(
            r#"
            SELECT id, titulo, descricao, endereco, categoria, data_criacao
            FROM relatos
            ORDER BY data_criacao DESC
            LIMIT $1
            "#,
        )
        .bind(RECENT_WINDOW)
        .fetch_all(&self.pool)
        .await?;

        let ids: Vec<Uuid> = relatos.iter().map(|r| r.id).collect();

        let fotos: Vec<Foto> = sqlx::query_as(
            r#"
            SELECT id, relato_id, url
            FROM fotos
            WHERE relato_id = ANY($1)
            "#,
        )
        .bind(&ids)
        .fetch_all(&self.pool)
        .await?;

        Ok(group_fotos(relatos, fotos))
    }
}

/// Attach foto URLs to their owning relatos, preserving relato order.
/// Relatos without fotos get an empty list.
fn group_fotos(relatos: Vec<Relato>, fotos: Vec<Foto>) -> Vec<RelatoWithFotos> {
    let mut by_relato: std::collections::HashMap<Uuid, Vec<String>> =
        std::collections::HashMap::new();
    for foto in fotos {
        by_relato.entry(foto.relato_id).or_default().push(foto.url);
    }

    relatos
        .into_iter()
        .map(|relato| {
            let fotos = by_relato.remove(&relato.id).unwrap_or_default();
            RelatoWithFotos { relato, fotos }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, Utc};
    use fake::faker::address::en::StreetName;
    use fake::faker::lorem::en::Sentence;
    use fake::Fake;

    fn sample_relato(age_mins: i64) -> Relato {
        Relato {
            id: Uuid::new_v4(),
            titulo: Sentence(1..4).fake(),
            descricao: Sentence(3..8).fake(),
            endereco: StreetName().fake(),
            categoria: "infraestrutura".to_string(),
            data_criacao: Utc::now() - Duration::minutes(age_mins),
        }
    }

    fn foto_for(relato_id: Uuid, url: &str) -> Foto {
        Foto {
            id: Uuid::new_v4(),
            relato_id,
            url: url.to_string(),
        }
    }

    #[test]
    fn groups_urls_under_owning_relato() {
        let a = sample_relato(0);
        let b = sample_relato(5);
        let fotos = vec![
            foto_for(a.id, "http://cdn/x/a1.jpg"),
            foto_for(b.id, "http://cdn/x/b1.jpg"),
            foto_for(a.id, "http://cdn/x/a2.jpg"),
        ];

        let grouped = group_fotos(vec![a.clone(), b.clone()], fotos);

        assert_eq!(grouped.len(), 2);
        assert_eq!(grouped[0].relato.id, a.id);
        assert_eq!(grouped[0].fotos.len(), 2);
        assert!(grouped[0].fotos.contains(&"http://cdn/x/a1.jpg".to_string()));
        assert!(grouped[0].fotos.contains(&"http://cdn/x/a2.jpg".to_string()));
        assert_eq!(grouped[1].fotos, vec!["http://cdn/x/b1.jpg".to_string()]);
    }

    #[test]
    fn relato_without_fotos_gets_empty_list() {
        let a = sample_relato(0);
        let grouped = group_fotos(vec![a], vec![]);

        assert_eq!(grouped.len(), 1);
        assert!(grouped[0].fotos.is_empty());
    }

    #[test]
    fn preserves_newest_first_order() {
        // Input order comes from the SQL ORDER BY; grouping must not reorder
        let relatos: Vec<Relato> = (0i64..4).map(sample_relato).collect();
        let ids: Vec<Uuid> = relatos.iter().map(|r| r.id).collect();

        let grouped = group_fotos(relatos, vec![]);
        let grouped_ids: Vec<Uuid> = grouped.iter().map(|g| g.relato.id).collect();

        assert_eq!(grouped_ids, ids);
        for pair in grouped.windows(2) {
            assert!(pair[0].relato.data_criacao >= pair[1].relato.data_criacao);
        }
    }
}
