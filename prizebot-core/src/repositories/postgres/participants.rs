// File: prizebot-core/src/repositories/postgres/participants.rs

use async_trait::async_trait;
use sqlx::{Pool, Postgres, Row};

use prizebot_common::error::Error;
use prizebot_common::models::Participant;
use prizebot_common::traits::repository_traits::ParticipantRepository;

#[derive(Clone)]
pub struct PostgresParticipantRepository {
    pool: Pool<Postgres>,
}

impl PostgresParticipantRepository {
    pub fn new(pool: Pool<Postgres>) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl ParticipantRepository for PostgresParticipantRepository {
    async fn insert_participant(&self, p: &Participant) -> Result<(), Error> {
        // The composite primary key decides who was first.
        let res = sqlx::query(
            r#"
            INSERT INTO participants (giveaway_id, user_id, joined_at)
            VALUES ($1, $2, $3)
            ON CONFLICT (giveaway_id, user_id) DO NOTHING
            "#,
        )
        .bind(&p.giveaway_id)
        .bind(&p.user_id)
        .bind(p.joined_at)
        .execute(&self.pool)
        .await?;

        if res.rows_affected() == 0 {
            return Err(Error::AlreadyJoined);
        }
        Ok(())
    }

    async fn count_participants(&self, giveaway_id: &str) -> Result<i64, Error> {
        let row = sqlx::query("SELECT COUNT(*) AS cnt FROM participants WHERE giveaway_id = $1")
            .bind(giveaway_id)
            .fetch_one(&self.pool)
            .await?;
        Ok(row.try_get("cnt")?)
    }

    async fn list_participants(&self, giveaway_id: &str) -> Result<Vec<Participant>, Error> {
        let rows = sqlx::query(
            r#"
            SELECT giveaway_id, user_id, joined_at
            FROM participants
            WHERE giveaway_id = $1
            ORDER BY joined_at, user_id
            "#,
        )
        .bind(giveaway_id)
        .fetch_all(&self.pool)
        .await?;

        let mut out = Vec::with_capacity(rows.len());
        for r in rows {
            out.push(Participant {
                giveaway_id: r.try_get("giveaway_id")?,
                user_id:     r.try_get("user_id")?,
                joined_at:   r.try_get("joined_at")?,
            });
        }
        Ok(out)
    }
}
