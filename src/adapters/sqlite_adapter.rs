//! SQLite adapter for accounts, saved stocks and simulations.

use crate::domain::config_validation::DEFAULT_POOL_SIZE;
use crate::domain::error::GatewayError;
use crate::domain::portfolio::{DateOpened, NewSimulation, SavedStock, Simulation};
use crate::domain::user::{normalize_email, UserRecord};
use crate::ports::config_port::ConfigPort;
use crate::ports::identity_port::IdentityPort;
use crate::ports::store_port::StorePort;
use chrono::{SecondsFormat, Utc};
use r2d2::{Pool, PooledConnection};
use r2d2_sqlite::SqliteConnectionManager;
use rusqlite::{params, OptionalExtension, Row};
use uuid::Uuid;

pub struct SqliteAdapter {
    pool: Pool<SqliteConnectionManager>,
}

impl SqliteAdapter {
    pub fn from_config(config: &dyn ConfigPort) -> Result<Self, GatewayError> {
        let db_path = config.require_string("database", "sqlite_path")?;
        let pool_size = config.get_int("database", "pool_size", DEFAULT_POOL_SIZE).max(1) as u32;

        if db_path == ":memory:" {
            return Self::in_memory();
        }

        let manager = SqliteConnectionManager::file(&db_path)
            .with_init(|c| c.execute_batch("PRAGMA foreign_keys = ON; PRAGMA busy_timeout = 5000;"));
        let pool = Pool::builder().max_size(pool_size).build(manager)?;

        Ok(Self { pool })
    }

    /// Single-connection pool; every pooled connection would otherwise see its own database.
    pub fn in_memory() -> Result<Self, GatewayError> {
        let manager = SqliteConnectionManager::memory()
            .with_init(|c| c.execute_batch("PRAGMA foreign_keys = ON;"));
        let pool = Pool::builder().max_size(1).build(manager)?;

        Ok(Self { pool })
    }

    pub fn initialize_schema(&self) -> Result<(), GatewayError> {
        let conn = self.conn()?;

        conn.execute_batch(
            "CREATE TABLE IF NOT EXISTS users (
                id TEXT PRIMARY KEY,
                email TEXT NOT NULL UNIQUE,
                password_hash TEXT NOT NULL,
                token_version INTEGER NOT NULL DEFAULT 0,
                created_at TEXT NOT NULL
            );
            CREATE TABLE IF NOT EXISTS saved_stocks (
                user_id TEXT NOT NULL REFERENCES users(id) ON DELETE CASCADE,
                symbol TEXT NOT NULL,
                saved_at TEXT NOT NULL,
                PRIMARY KEY (user_id, symbol)
            );
            CREATE TABLE IF NOT EXISTS simulations (
                id TEXT PRIMARY KEY,
                user_id TEXT NOT NULL REFERENCES users(id) ON DELETE CASCADE,
                name TEXT NOT NULL,
                starting_balance REAL NOT NULL,
                simulated_cash REAL NOT NULL,
                profit_loss REAL NOT NULL,
                win_rate REAL NOT NULL,
                starting_ticker TEXT NOT NULL,
                opened_day INTEGER NOT NULL,
                opened_month INTEGER NOT NULL,
                opened_year INTEGER NOT NULL,
                created_at TEXT NOT NULL
            );
            CREATE INDEX IF NOT EXISTS idx_simulations_user ON simulations(user_id);",
        )?;

        Ok(())
    }

    fn conn(&self) -> Result<PooledConnection<SqliteConnectionManager>, GatewayError> {
        Ok(self.pool.get()?)
    }

    fn insert_user(&self, user: &UserRecord) -> Result<(), GatewayError> {
        self.conn()?
            .execute(
                "INSERT INTO users (id, email, password_hash, token_version, created_at)
                 VALUES (?1, ?2, ?3, ?4, ?5)",
                params![
                    user.id,
                    user.email,
                    user.password_hash,
                    user.token_version,
                    now_rfc3339()
                ],
            )
            .map_err(map_user_insert_error)?;
        Ok(())
    }
}

/// A concurrent signup can pass the lookup in `create_user` and still lose on
/// the UNIQUE email index.
fn map_user_insert_error(err: rusqlite::Error) -> GatewayError {
    match err {
        rusqlite::Error::SqliteFailure(e, _) if e.code == rusqlite::ErrorCode::ConstraintViolation => {
            GatewayError::Auth {
                reason: "email already registered".to_string(),
            }
        }
        other => other.into(),
    }
}

fn now_rfc3339() -> String {
    Utc::now().to_rfc3339_opts(SecondsFormat::Millis, true)
}

fn user_from_row(row: &Row<'_>) -> rusqlite::Result<UserRecord> {
    Ok(UserRecord {
        id: row.get(0)?,
        email: row.get(1)?,
        password_hash: row.get(2)?,
        token_version: row.get(3)?,
    })
}

fn simulation_from_row(row: &Row<'_>) -> rusqlite::Result<Simulation> {
    Ok(Simulation {
        id: row.get(0)?,
        name: row.get(1)?,
        starting_balance: row.get(2)?,
        simulated_cash: row.get(3)?,
        profit_loss: row.get(4)?,
        win_rate: row.get(5)?,
        starting_ticker: row.get(6)?,
        date_opened: DateOpened {
            day: row.get(7)?,
            month: row.get(8)?,
            year: row.get(9)?,
        },
    })
}

impl IdentityPort for SqliteAdapter {
    fn create_user(&self, email: &str, password_hash: &str) -> Result<UserRecord, GatewayError> {
        let email = normalize_email(email);
        if self.find_by_email(&email)?.is_some() {
            return Err(GatewayError::Auth {
                reason: "email already registered".to_string(),
            });
        }

        let user = UserRecord {
            id: Uuid::new_v4().to_string(),
            email,
            password_hash: password_hash.to_string(),
            token_version: 0,
        };
        self.insert_user(&user)?;
        Ok(user)
    }

    fn find_by_email(&self, email: &str) -> Result<Option<UserRecord>, GatewayError> {
        let user = self
            .conn()?
            .query_row(
                "SELECT id, email, password_hash, token_version FROM users WHERE email = ?1",
                params![normalize_email(email)],
                user_from_row,
            )
            .optional()?;
        Ok(user)
    }

    fn find_by_id(&self, user_id: &str) -> Result<Option<UserRecord>, GatewayError> {
        let user = self
            .conn()?
            .query_row(
                "SELECT id, email, password_hash, token_version FROM users WHERE id = ?1",
                params![user_id],
                user_from_row,
            )
            .optional()?;
        Ok(user)
    }

    fn revoke_tokens(&self, user_id: &str) -> Result<(), GatewayError> {
        let updated = self.conn()?.execute(
            "UPDATE users SET token_version = token_version + 1 WHERE id = ?1",
            params![user_id],
        )?;
        if updated == 0 {
            return Err(GatewayError::Auth {
                reason: format!("unknown user {}", user_id),
            });
        }
        Ok(())
    }
}

impl StorePort for SqliteAdapter {
    fn saved_stocks(&self, user_id: &str) -> Result<Vec<SavedStock>, GatewayError> {
        let conn = self.conn()?;
        let mut stmt = conn.prepare(
            "SELECT symbol, saved_at FROM saved_stocks
             WHERE user_id = ?1
             ORDER BY saved_at ASC, rowid ASC",
        )?;
        let rows = stmt.query_map(params![user_id], |row| {
            Ok(SavedStock {
                symbol: row.get(0)?,
                saved_at: row.get(1)?,
            })
        })?;

        let mut stocks = Vec::new();
        for row in rows {
            stocks.push(row?);
        }
        Ok(stocks)
    }

    fn save_stock(&self, user_id: &str, symbol: &str) -> Result<SavedStock, GatewayError> {
        let conn = self.conn()?;
        conn.execute(
            "INSERT OR IGNORE INTO saved_stocks (user_id, symbol, saved_at) VALUES (?1, ?2, ?3)",
            params![user_id, symbol, now_rfc3339()],
        )?;
        let saved = conn.query_row(
            "SELECT symbol, saved_at FROM saved_stocks WHERE user_id = ?1 AND symbol = ?2",
            params![user_id, symbol],
            |row| {
                Ok(SavedStock {
                    symbol: row.get(0)?,
                    saved_at: row.get(1)?,
                })
            },
        )?;
        Ok(saved)
    }

    fn remove_stock(&self, user_id: &str, symbol: &str) -> Result<bool, GatewayError> {
        let removed = self.conn()?.execute(
            "DELETE FROM saved_stocks WHERE user_id = ?1 AND symbol = ?2",
            params![user_id, symbol],
        )?;
        Ok(removed > 0)
    }

    fn is_saved(&self, user_id: &str, symbol: &str) -> Result<bool, GatewayError> {
        let found: Option<i64> = self
            .conn()?
            .query_row(
                "SELECT 1 FROM saved_stocks WHERE user_id = ?1 AND symbol = ?2",
                params![user_id, symbol],
                |row| row.get(0),
            )
            .optional()?;
        Ok(found.is_some())
    }

    fn create_simulation(
        &self,
        user_id: &str,
        new_sim: &NewSimulation,
    ) -> Result<Simulation, GatewayError> {
        let sim = new_sim.open(Uuid::new_v4().to_string(), Utc::now().date_naive());
        self.conn()?.execute(
            "INSERT INTO simulations (id, user_id, name, starting_balance, simulated_cash,
                profit_loss, win_rate, starting_ticker, opened_day, opened_month, opened_year,
                created_at)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?12)",
            params![
                sim.id,
                user_id,
                sim.name,
                sim.starting_balance,
                sim.simulated_cash,
                sim.profit_loss,
                sim.win_rate,
                sim.starting_ticker,
                sim.date_opened.day,
                sim.date_opened.month,
                sim.date_opened.year,
                now_rfc3339()
            ],
        )?;
        Ok(sim)
    }

    fn simulations(&self, user_id: &str) -> Result<Vec<Simulation>, GatewayError> {
        let conn = self.conn()?;
        let mut stmt = conn.prepare(
            "SELECT id, name, starting_balance, simulated_cash, profit_loss, win_rate,
                    starting_ticker, opened_day, opened_month, opened_year
             FROM simulations
             WHERE user_id = ?1
             ORDER BY created_at ASC, rowid ASC",
        )?;
        let rows = stmt.query_map(params![user_id], simulation_from_row)?;

        let mut sims = Vec::new();
        for row in rows {
            sims.push(row?);
        }
        Ok(sims)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::file_config_adapter::FileConfigAdapter;

    fn setup() -> SqliteAdapter {
        let adapter = SqliteAdapter::in_memory().unwrap();
        adapter.initialize_schema().unwrap();
        adapter
    }

    fn user(adapter: &SqliteAdapter, email: &str) -> UserRecord {
        adapter.create_user(email, "$argon2id$fake").unwrap()
    }

    #[test]
    fn schema_initialization_is_idempotent() {
        let adapter = setup();
        adapter.initialize_schema().unwrap();
    }

    #[test]
    fn create_and_find_user() {
        let adapter = setup();
        let created = user(&adapter, "Ada@Example.com");
        assert_eq!(created.email, "ada@example.com");
        assert_eq!(created.token_version, 0);

        let by_email = adapter.find_by_email("ADA@example.com").unwrap().unwrap();
        assert_eq!(by_email, created);
        let by_id = adapter.find_by_id(&created.id).unwrap().unwrap();
        assert_eq!(by_id, created);
        assert!(adapter.find_by_id("nope").unwrap().is_none());
    }

    #[test]
    fn duplicate_email_is_auth_error() {
        let adapter = setup();
        user(&adapter, "ada@example.com");
        let err = adapter
            .create_user(" ADA@example.com", "$argon2id$other")
            .unwrap_err();
        assert!(matches!(err, GatewayError::Auth { .. }));
    }

    #[test]
    fn unique_email_violation_is_auth_error() {
        let adapter = setup();
        let first = user(&adapter, "ada@example.com");
        let racer = UserRecord {
            id: Uuid::new_v4().to_string(),
            ..first
        };

        let err = adapter.insert_user(&racer).unwrap_err();

        match err {
            GatewayError::Auth { reason } => assert_eq!(reason, "email already registered"),
            other => panic!("expected Auth, got {other:?}"),
        }
    }

    #[test]
    fn revoke_tokens_bumps_version() {
        let adapter = setup();
        let created = user(&adapter, "ada@example.com");
        adapter.revoke_tokens(&created.id).unwrap();
        adapter.revoke_tokens(&created.id).unwrap();
        let reloaded = adapter.find_by_id(&created.id).unwrap().unwrap();
        assert_eq!(reloaded.token_version, 2);
        assert!(adapter.revoke_tokens("missing").is_err());
    }

    #[test]
    fn saved_stocks_round_trip() {
        let adapter = setup();
        let u = user(&adapter, "ada@example.com");

        assert!(adapter.saved_stocks(&u.id).unwrap().is_empty());
        assert!(!adapter.is_saved(&u.id, "AAPL").unwrap());

        let first = adapter.save_stock(&u.id, "AAPL").unwrap();
        let again = adapter.save_stock(&u.id, "AAPL").unwrap();
        assert_eq!(first, again);
        adapter.save_stock(&u.id, "MSFT").unwrap();

        let symbols: Vec<_> = adapter
            .saved_stocks(&u.id)
            .unwrap()
            .into_iter()
            .map(|s| s.symbol)
            .collect();
        assert_eq!(symbols, vec!["AAPL", "MSFT"]);
        assert!(adapter.is_saved(&u.id, "AAPL").unwrap());

        assert!(adapter.remove_stock(&u.id, "AAPL").unwrap());
        assert!(!adapter.remove_stock(&u.id, "AAPL").unwrap());
        assert!(!adapter.is_saved(&u.id, "AAPL").unwrap());
    }

    #[test]
    fn saved_stocks_are_per_user() {
        let adapter = setup();
        let a = user(&adapter, "a@example.com");
        let b = user(&adapter, "b@example.com");
        adapter.save_stock(&a.id, "TSLA").unwrap();
        assert!(adapter.is_saved(&a.id, "TSLA").unwrap());
        assert!(!adapter.is_saved(&b.id, "TSLA").unwrap());
        assert!(adapter.saved_stocks(&b.id).unwrap().is_empty());
    }

    #[test]
    fn simulations_round_trip() {
        let adapter = setup();
        let u = user(&adapter, "ada@example.com");
        let other = user(&adapter, "bob@example.com");

        let created = adapter
            .create_simulation(&u.id, &NewSimulation::new("Growth", 5000.0, "nvda").unwrap())
            .unwrap();
        adapter
            .create_simulation(&u.id, &NewSimulation::new("Value", 1000.0, "KO").unwrap())
            .unwrap();

        let sims = adapter.simulations(&u.id).unwrap();
        assert_eq!(sims.len(), 2);
        assert_eq!(sims[0], created);
        assert_eq!(sims[0].starting_ticker, "NVDA");
        assert_eq!(sims[0].simulated_cash, 5000.0);
        assert_eq!(sims[1].name, "Value");
        assert!(adapter.simulations(&other.id).unwrap().is_empty());
    }

    #[test]
    fn from_config_requires_path() {
        let config = FileConfigAdapter::from_string("[database]\npool_size = 2\n").unwrap();
        let err = SqliteAdapter::from_config(&config).err().unwrap();
        assert!(matches!(err, GatewayError::NotConfigured { ref key, .. } if key == "sqlite_path"));
    }

    #[test]
    fn from_config_opens_file_database() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("stockgate.db");
        let config = FileConfigAdapter::from_string(&format!(
            "[database]\nsqlite_path = {}\n",
            path.display()
        ))
        .unwrap();
        let adapter = SqliteAdapter::from_config(&config).unwrap();
        adapter.initialize_schema().unwrap();
        let u = user(&adapter, "ada@example.com");
        adapter.save_stock(&u.id, "AAPL").unwrap();
        assert!(adapter.is_saved(&u.id, "AAPL").unwrap());
    }
}
