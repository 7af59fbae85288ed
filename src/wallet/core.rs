use rusqlite::Connection;

use crate::Error;

pub type WalletId = i64;

/// The fee rate used when a wallet has no usable default rate.
pub const FALLBACK_DEFAULT_RATE: f64 = 0.02;

/// An e-wallet account that records are tracked under.
#[derive(Debug, Clone, PartialEq)]
pub struct Wallet {
    /// The id for the wallet.
    pub id: WalletId,
    /// The display name of the wallet.
    pub name: String,
    /// The URL-safe identifier derived from the name.
    pub slug: String,
    /// The cell number the wallet is registered to.
    pub cell_number: String,
    /// The e-wallet provider, e.g. "GCash".
    pub wallet_type: String,
    /// The fee rate used by the fee suggestion ladder.
    pub default_rate: f64,
}

pub fn create_wallet_table(connection: &Connection) -> Result<(), rusqlite::Error> {
    connection.execute(
        "CREATE TABLE IF NOT EXISTS wallet (
            id INTEGER PRIMARY KEY,
            name TEXT NOT NULL UNIQUE,
            slug TEXT NOT NULL UNIQUE,
            cell_number TEXT NOT NULL,
            wallet_type TEXT NOT NULL,
            default_rate REAL NOT NULL
        )",
        (),
    )?;

    Ok(())
}

pub fn map_row_to_wallet(row: &rusqlite::Row) -> Result<Wallet, rusqlite::Error> {
    let id = row.get(0)?;
    let name = row.get(1)?;
    let slug = row.get(2)?;
    let cell_number = row.get(3)?;
    let wallet_type = row.get(4)?;
    let default_rate = row.get(5)?;

    Ok(Wallet {
        id,
        name,
        slug,
        cell_number,
        wallet_type,
        default_rate,
    })
}

/// Retrieve a wallet from the database by its `id`.
///
/// # Errors
/// This function will return a:
/// - [Error::NotFound] if `id` does not refer to a valid wallet,
/// - or [Error::SqlError] there is some other SQL error.
pub fn get_wallet(id: WalletId, connection: &Connection) -> Result<Wallet, Error> {
    let wallet = connection
        .prepare(
            "SELECT id, name, slug, cell_number, wallet_type, default_rate
            FROM wallet WHERE id = :id",
        )?
        .query_one(&[(":id", &id)], map_row_to_wallet)?;

    Ok(wallet)
}

/// Retrieve all wallets ordered by name.
pub fn get_all_wallets(connection: &Connection) -> Result<Vec<Wallet>, Error> {
    connection
        .prepare(
            "SELECT id, name, slug, cell_number, wallet_type, default_rate
            FROM wallet ORDER BY name ASC",
        )?
        .query_map([], map_row_to_wallet)?
        .map(|maybe_wallet| maybe_wallet.map_err(Error::from))
        .collect()
}

/// Get the default fee rate for the wallet `id`.
///
/// Falls back to [FALLBACK_DEFAULT_RATE] when the wallet cannot be found or
/// its rate is not positive, so callers always get a usable rate.
pub fn get_default_rate(id: WalletId, connection: &Connection) -> f64 {
    let rate: Result<f64, _> =
        connection.query_one("SELECT default_rate FROM wallet WHERE id = ?1", [id], |row| {
            row.get(0)
        });

    match rate {
        Ok(rate) if rate > 0.0 => rate,
        Ok(rate) => {
            tracing::warn!("Wallet {id} has an invalid default rate {rate}, using the fallback.");
            FALLBACK_DEFAULT_RATE
        }
        Err(error) => {
            tracing::warn!("Could not get the default rate for wallet {id}: {error}");
            FALLBACK_DEFAULT_RATE
        }
    }
}

/// Derive a URL-safe slug from a wallet name.
///
/// Lowercases the name, keeps alphanumeric characters and replaces runs of
/// anything else with a single hyphen.
pub fn slugify(name: &str) -> String {
    let mut slug = String::with_capacity(name.len());

    for character in name.chars() {
        if character.is_ascii_alphanumeric() {
            slug.extend(character.to_lowercase());
        } else if !slug.ends_with('-') && !slug.is_empty() {
            slug.push('-');
        }
    }

    slug.trim_end_matches('-').to_owned()
}

/// Check that `cell_number` is a valid Philippine mobile number.
///
/// Accepts the formats 09XXXXXXXXX and +639XXXXXXXXX.
pub fn is_valid_cell_number(cell_number: &str) -> bool {
    let digits = cell_number
        .strip_prefix("+639")
        .or_else(|| cell_number.strip_prefix("09"));

    match digits {
        Some(rest) => rest.len() == 9 && rest.bytes().all(|byte| byte.is_ascii_digit()),
        None => false,
    }
}

#[cfg(test)]
mod create_table_tests {
    use rusqlite::Connection;

    use super::create_wallet_table;

    #[test]
    fn sql_is_valid() {
        let connection =
            Connection::open_in_memory().expect("Could not initialise in-memory SQLite database");

        assert_eq!(Ok(()), create_wallet_table(&connection));
    }
}

#[cfg(test)]
mod get_wallet_tests {
    use rusqlite::Connection;

    use crate::Error;

    use super::{Wallet, create_wallet_table, get_all_wallets, get_wallet};

    fn get_test_connection() -> Connection {
        let conn = Connection::open_in_memory().unwrap();
        create_wallet_table(&conn).unwrap();
        conn
    }

    fn insert_wallet(wallet: &Wallet, connection: &Connection) {
        connection
            .execute(
                "INSERT INTO wallet (id, name, slug, cell_number, wallet_type, default_rate)
                VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
                (
                    wallet.id,
                    &wallet.name,
                    &wallet.slug,
                    &wallet.cell_number,
                    &wallet.wallet_type,
                    wallet.default_rate,
                ),
            )
            .unwrap();
    }

    #[test]
    fn returns_wallet_by_id() {
        let conn = get_test_connection();
        let want = Wallet {
            id: 1,
            name: "Main GCash".to_owned(),
            slug: "main-gcash".to_owned(),
            cell_number: "09171234567".to_owned(),
            wallet_type: "GCash".to_owned(),
            default_rate: 0.02,
        };
        insert_wallet(&want, &conn);

        let got = get_wallet(1, &conn).unwrap();

        assert_eq!(want, got);
    }

    #[test]
    fn returns_not_found_for_missing_wallet() {
        let conn = get_test_connection();

        let got = get_wallet(42, &conn);

        assert_eq!(got, Err(Error::NotFound));
    }

    #[test]
    fn returns_all_wallets_sorted_by_name() {
        let conn = get_test_connection();
        let zebra = Wallet {
            id: 1,
            name: "Zebra Wallet".to_owned(),
            slug: "zebra-wallet".to_owned(),
            cell_number: "09171234567".to_owned(),
            wallet_type: "Maya".to_owned(),
            default_rate: 0.02,
        };
        let apple = Wallet {
            id: 2,
            name: "Apple Wallet".to_owned(),
            slug: "apple-wallet".to_owned(),
            cell_number: "09179876543".to_owned(),
            wallet_type: "GCash".to_owned(),
            default_rate: 0.015,
        };
        insert_wallet(&zebra, &conn);
        insert_wallet(&apple, &conn);

        let got = get_all_wallets(&conn).unwrap();

        assert_eq!(got, vec![apple, zebra]);
    }
}


#[cfg(test)]
mod slugify_tests {
    use super::slugify;

    #[test]
    fn lowercases_and_hyphenates() {
        assert_eq!(slugify("Main GCash"), "main-gcash");
    }

    #[test]
    fn collapses_runs_of_punctuation() {
        assert_eq!(slugify("Tita's  Wallet!"), "tita-s-wallet");
    }

    #[test]
    fn trims_leading_and_trailing_separators() {
        assert_eq!(slugify("  Maya  "), "maya");
    }
}
