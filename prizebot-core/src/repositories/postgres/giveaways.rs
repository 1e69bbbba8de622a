// File: prizebot-core/src/repositories/postgres/giveaways.rs
//
// Giveaway rows live in `giveaways`; the type-specific settings are a JSONB
// document in `type_data`. Both state-changing statements (`update_active`,
// `mark_ended`) are conditional on `status = 'active'`, which is what lets a
// win and an expiry race safely.

use async_trait::async_trait;
use sqlx::postgres::PgRow;
use sqlx::types::Json;
use sqlx::{Pool, Postgres, QueryBuilder, Row};
use tracing::warn;

use prizebot_common::error::Error;
use prizebot_common::models::{
    Giveaway, GiveawayKind, GiveawayPatch, GiveawayStatus, NewGiveaway, TypeData,
};
use prizebot_common::traits::repository_traits::GiveawayRepository;

const GIVEAWAY_COLUMNS: &str = "message_id, channel_id, thread_id, guild_id, organizer_id, prize, \
     image_url, end_timestamp, kind, status, type_data, created_at";

#[derive(Clone)]
pub struct PostgresGiveawayRepository {
    pool: Pool<Postgres>,
}

impl PostgresGiveawayRepository {
    pub fn new(pool: Pool<Postgres>) -> Self {
        Self { pool }
    }
}

fn giveaway_from_row(r: &PgRow) -> Result<Giveaway, Error> {
    let kind: String = r.try_get("kind")?;
    let status: String = r.try_get("status")?;
    let Json(type_data): Json<TypeData> = r.try_get("type_data")?;
    let kind: GiveawayKind = kind.parse()?;
    if type_data.kind() != kind {
        return Err(Error::Parse(format!(
            "type_data of giveaway does not match kind '{kind}'"
        )));
    }
    Ok(Giveaway {
        message_id:    r.try_get("message_id")?,
        channel_id:    r.try_get("channel_id")?,
        thread_id:     r.try_get("thread_id")?,
        guild_id:      r.try_get("guild_id")?,
        organizer_id:  r.try_get("organizer_id")?,
        prize:         r.try_get("prize")?,
        image_url:     r.try_get("image_url")?,
        end_timestamp: r.try_get("end_timestamp")?,
        kind,
        status:        status.parse::<GiveawayStatus>()?,
        type_data,
        created_at:    r.try_get("created_at")?,
    })
}

/// Decodes a listing, skipping rows that fail to decode so one corrupt row
/// cannot block startup or the expiry poll.
fn decodable_rows(rows: &[PgRow]) -> Vec<Giveaway> {
    rows.iter()
        .filter_map(|r| match giveaway_from_row(r) {
            Ok(g) => Some(g),
            Err(e) => {
                let id: String = r.try_get("message_id").unwrap_or_default();
                warn!("Skipping undecodable giveaway row {id}: {e}");
                None
            }
        })
        .collect()
}

#[async_trait]
impl GiveawayRepository for PostgresGiveawayRepository {
    async fn insert_giveaway(&self, g: &NewGiveaway) -> Result<Giveaway, Error> {
        let q = format!(
            r#"
            INSERT INTO giveaways
                (message_id, channel_id, thread_id, guild_id, organizer_id, prize,
                 image_url, end_timestamp, kind, status, type_data)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, 'active', $10)
            RETURNING {GIVEAWAY_COLUMNS}
            "#
        );
        let row = sqlx::query(&q)
            .bind(&g.message_id)
            .bind(&g.channel_id)
            .bind(&g.thread_id)
            .bind(&g.guild_id)
            .bind(&g.organizer_id)
            .bind(&g.prize)
            .bind(&g.image_url)
            .bind(g.end_timestamp)
            .bind(g.type_data.kind().to_string())
            .bind(Json(g.type_data.clone()))
            .fetch_one(&self.pool)
            .await?;
        giveaway_from_row(&row)
    }

    async fn get_giveaway(&self, message_id: &str) -> Result<Option<Giveaway>, Error> {
        let q = format!("SELECT {GIVEAWAY_COLUMNS} FROM giveaways WHERE message_id = $1");
        let row = sqlx::query(&q)
            .bind(message_id)
            .fetch_optional(&self.pool)
            .await?;
        row.as_ref().map(giveaway_from_row).transpose()
    }

    async fn list_active_guess(&self) -> Result<Vec<Giveaway>, Error> {
        let q = format!(
            "SELECT {GIVEAWAY_COLUMNS} FROM giveaways \
             WHERE status = 'active' AND kind = 'guess' \
             ORDER BY end_timestamp"
        );
        let rows = sqlx::query(&q).fetch_all(&self.pool).await?;
        Ok(decodable_rows(&rows))
    }

    async fn list_expired(&self, now_ms: i64) -> Result<Vec<Giveaway>, Error> {
        let q = format!(
            "SELECT {GIVEAWAY_COLUMNS} FROM giveaways \
             WHERE status = 'active' AND end_timestamp <= $1 \
             ORDER BY end_timestamp"
        );
        let rows = sqlx::query(&q).bind(now_ms).fetch_all(&self.pool).await?;
        Ok(decodable_rows(&rows))
    }

    async fn update_active(
        &self,
        message_id: &str,
        patch: &GiveawayPatch,
    ) -> Result<Option<Giveaway>, Error> {
        if patch.is_empty() {
            return Err(Error::NothingToUpdate);
        }

        let mut qb: QueryBuilder<Postgres> = QueryBuilder::new("UPDATE giveaways SET ");
        let mut set = qb.separated(", ");
        if let Some(prize) = &patch.prize {
            set.push("prize = ");
            set.push_bind_unseparated(prize);
        }
        if let Some(end) = patch.end_timestamp {
            set.push("end_timestamp = ");
            set.push_bind_unseparated(end);
        }
        qb.push(" WHERE message_id = ");
        qb.push_bind(message_id);
        qb.push(" AND status = 'active' RETURNING ");
        qb.push(GIVEAWAY_COLUMNS);

        let row = qb.build().fetch_optional(&self.pool).await?;
        row.as_ref().map(giveaway_from_row).transpose()
    }

    async fn mark_ended(&self, message_id: &str) -> Result<bool, Error> {
        let res = sqlx::query(
            r#"
            UPDATE giveaways
            SET status = 'ended'
            WHERE message_id = $1 AND status = 'active'
            "#,
        )
        .bind(message_id)
        .execute(&self.pool)
        .await?;
        Ok(res.rows_affected() == 1)
    }
}
