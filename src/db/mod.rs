//! PostgreSQL store
//!
//! Diesel over an r2d2 pool. Diesel is synchronous, so every call hops onto
//! the blocking thread pool.

use async_trait::async_trait;
use diesel::{
    prelude::*,
    r2d2::{ConnectionManager, Pool},
    result::{DatabaseErrorKind, Error as DieselError},
    sql_query,
    sql_types::BigInt,
    upsert::excluded,
    PgConnection,
};
use diesel_migrations::{embed_migrations, EmbeddedMigrations, MigrationHarness};
use tracing::{debug, info};

use crate::common::{
    now_millis, CasinoStore, GameState, LeaderboardEntry, LeaderboardStat, User, UserId,
    UserPatch,
};
use crate::errors::{StoreError, StoreResult};

pub mod models;
pub mod schema;

use models::{GameStateRow, GameStateUpsert, NewGameState, NewUser, ScoreRow, UserChanges, UserRow};

const MIGRATIONS: EmbeddedMigrations = embed_migrations!();

pub type DbPool = Pool<ConnectionManager<PgConnection>>;

/// [`CasinoStore`] backed by PostgreSQL
#[derive(Clone)]
pub struct PgStore {
    pool: DbPool,
}

impl PgStore {
    /// Build a connection pool for `database_url`
    pub fn connect(database_url: &str, max_size: u32) -> StoreResult<Self> {
        let manager = ConnectionManager::<PgConnection>::new(database_url);
        let pool = Pool::builder()
            .max_size(max_size)
            .build(manager)
            .map_err(|e| StoreError::Pool(e.to_string()))?;
        Ok(Self { pool })
    }

    /// Apply any pending embedded migrations
    pub fn run_migrations(&self) -> StoreResult<()> {
        let mut conn = self.pool.get().map_err(|e| StoreError::Pool(e.to_string()))?;
        let applied = conn
            .run_pending_migrations(MIGRATIONS)
            .map_err(|e| StoreError::Migration(e.to_string()))?;
        info!("Migrations completed ({} applied)", applied.len());
        Ok(())
    }

    async fn with_conn<T, F>(&self, f: F) -> StoreResult<T>
    where
        T: Send + 'static,
        F: FnOnce(&mut PgConnection) -> StoreResult<T> + Send + 'static,
    {
        let pool = self.pool.clone();
        tokio::task::spawn_blocking(move || {
            let mut conn = pool.get().map_err(|e| StoreError::Pool(e.to_string()))?;
            f(&mut conn)
        })
        .await
        .map_err(|e| StoreError::Task(e.to_string()))?
    }
}

fn insert_empty_state(conn: &mut PgConnection, user_id: UserId) -> Result<(), DieselError> {
    use schema::game_states;

    diesel::insert_into(game_states::table)
        .values(&NewGameState { user_id })
        .on_conflict(game_states::user_id)
        .do_nothing()
        .execute(conn)?;
    Ok(())
}

#[async_trait]
impl CasinoStore for PgStore {
    async fn username_exists(&self, name: &str) -> StoreResult<bool> {
        let name = name.to_string();
        self.with_conn(move |conn| {
            use schema::users::dsl::{username, users};

            let exists = diesel::select(diesel::dsl::exists(users.filter(username.eq(&name))))
                .get_result::<bool>(conn)?;
            Ok(exists)
        })
        .await
    }

    async fn create_user(&self, name: &str, pass: &str) -> StoreResult<User> {
        let name = name.to_string();
        let pass = pass.to_string();
        self.with_conn(move |conn| {
            use schema::users;

            let row = conn
                .transaction::<UserRow, DieselError, _>(|conn| {
                    let row = diesel::insert_into(users::table)
                        .values(&NewUser {
                            username: &name,
                            password: &pass,
                        })
                        .get_result::<UserRow>(conn)?;
                    insert_empty_state(conn, row.id)?;
                    Ok(row)
                })
                .map_err(|e| match e {
                    DieselError::DatabaseError(DatabaseErrorKind::UniqueViolation, _) => {
                        StoreError::DuplicateUsername(name.clone())
                    }
                    other => StoreError::Query(other),
                })?;

            debug!("Created user {} ({})", row.id, row.username);
            row.into_user()
        })
        .await
    }

    async fn find_by_credentials(
        &self,
        name: &str,
        pass: &str,
    ) -> StoreResult<Option<User>> {
        let name = name.to_string();
        let pass = pass.to_string();
        self.with_conn(move |conn| {
            use schema::users::dsl::{password, username, users};

            users
                .filter(username.eq(&name).and(password.eq(&pass)))
                .first::<UserRow>(conn)
                .optional()?
                .map(UserRow::into_user)
                .transpose()
        })
        .await
    }

    async fn ensure_game_state(&self, user_id: UserId) -> StoreResult<()> {
        self.with_conn(move |conn| Ok(insert_empty_state(conn, user_id)?))
            .await
    }

    async fn get_user(&self, user_id: UserId) -> StoreResult<Option<User>> {
        self.with_conn(move |conn| {
            use schema::users::dsl::users;

            users
                .find(user_id)
                .first::<UserRow>(conn)
                .optional()?
                .map(UserRow::into_user)
                .transpose()
        })
        .await
    }

    async fn update_user(&self, user_id: UserId, patch: &UserPatch) -> StoreResult<Option<User>> {
        let patch = patch.clone();
        self.with_conn(move |conn| {
            use schema::users::dsl::users;

            conn.transaction::<Option<User>, StoreError, _>(|conn| {
                let Some(current) = users
                    .find(user_id)
                    .for_update()
                    .first::<UserRow>(conn)
                    .optional()?
                else {
                    return Ok(None);
                };

                let mut user = current.into_user()?;
                patch.apply(&mut user);

                let updated = diesel::update(users.find(user_id))
                    .set(&UserChanges::from_user(&user))
                    .get_result::<UserRow>(conn)?;
                Ok(Some(updated.into_user()?))
            })
        })
        .await
    }

    async fn load_game_state(&self, user_id: UserId) -> StoreResult<GameState> {
        self.with_conn(move |conn| {
            use schema::game_states::dsl::game_states;

            match game_states
                .find(user_id)
                .first::<GameStateRow>(conn)
                .optional()?
            {
                Some(row) => row.into_state(),
                None => {
                    insert_empty_state(conn, user_id)?;
                    Ok(GameState::default())
                }
            }
        })
        .await
    }

    async fn save_game_state(&self, user_id: UserId, state: &GameState) -> StoreResult<()> {
        let row = GameStateUpsert::new(user_id, state, now_millis());
        self.with_conn(move |conn| {
            use schema::game_states::dsl::{
                achievements, current_streak, game_history, game_states, progressive_jackpot,
                updated_at, user_id as state_owner,
            };

            diesel::insert_into(game_states)
                .values(&row)
                .on_conflict(state_owner)
                .do_update()
                .set((
                    game_history.eq(excluded(game_history)),
                    achievements.eq(excluded(achievements)),
                    current_streak.eq(excluded(current_streak)),
                    progressive_jackpot.eq(excluded(progressive_jackpot)),
                    updated_at.eq(excluded(updated_at)),
                ))
                .execute(conn)?;
            Ok(())
        })
        .await
    }

    async fn top_users(
        &self,
        stat: LeaderboardStat,
        limit: i64,
    ) -> StoreResult<Vec<LeaderboardEntry>> {
        // The key comes from a closed enum, never from request input.
        // Non-numeric values score 0 and fractions are floored.
        let query = format!(
            "SELECT username, \
             CASE WHEN jsonb_typeof(stats->'{key}') = 'number' \
             THEN FLOOR((stats->>'{key}')::NUMERIC)::BIGINT ELSE 0 END AS score \
             FROM users ORDER BY score DESC, id ASC LIMIT $1",
            key = stat.json_key()
        );
        self.with_conn(move |conn| {
            let rows = sql_query(query)
                .bind::<BigInt, _>(limit)
                .load::<ScoreRow>(conn)?;
            Ok(rows.into_iter().map(LeaderboardEntry::from).collect())
        })
        .await
    }
}
