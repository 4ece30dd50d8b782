//! Database vendor lookup tables.
//!
//! Maps a vendor to its driver identifier, its connection URL template and
//! the statement that reports the server version. Pure functions only.

use crate::error::{ResultsError, Result};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Database products whose URL and driver conventions are known.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Vendor {
    Oracle,
    #[default]
    Postgres,
    Mysql,
    Sqlite,
}

impl Vendor {
    /// All known vendors, in lookup order.
    pub const ALL: [Vendor; 4] = [Self::Oracle, Self::Postgres, Self::Mysql, Self::Sqlite];

    /// Returns the vendor as a lowercase name.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Oracle => "oracle",
            Self::Postgres => "postgres",
            Self::Mysql => "mysql",
            Self::Sqlite => "sqlite",
        }
    }

    /// Parses a vendor name, ignoring case.
    pub fn parse(name: &str) -> Option<Self> {
        match name.trim().to_lowercase().as_str() {
            "oracle" => Some(Self::Oracle),
            "postgres" | "postgresql" => Some(Self::Postgres),
            "mysql" => Some(Self::Mysql),
            "sqlite" | "sqlite3" => Some(Self::Sqlite),
            _ => None,
        }
    }

    /// Returns the product name shown alongside query results.
    pub fn product_name(&self) -> &'static str {
        match self {
            Self::Oracle => "Oracle",
            Self::Postgres => "PostgreSQL",
            Self::Mysql => "MySQL",
            Self::Sqlite => "SQLite",
        }
    }

    /// Returns the identifier of the driver that serves this vendor.
    ///
    /// The identifier names the `sqlx` driver module used for connections.
    /// Oracle has a URL template but no driver linked into this build.
    pub fn driver(&self) -> Result<&'static str> {
        match self {
            Self::Postgres => Ok("postgres"),
            Self::Mysql => Ok("mysql"),
            Self::Sqlite => Ok("sqlite"),
            Self::Oracle => Err(ResultsError::unsupported_vendor(
                "no oracle driver is available in this build",
            )),
        }
    }

    /// Returns the default port, or `None` for file-based vendors.
    pub fn default_port(&self) -> Option<u16> {
        match self {
            Self::Oracle => Some(1521),
            Self::Postgres => Some(5432),
            Self::Mysql => Some(3306),
            Self::Sqlite => None,
        }
    }

    /// Builds a connection URL for this vendor.
    ///
    /// For SQLite `database` is a file path (or `:memory:`), host and port are
    /// ignored, and a missing file is created. Credentials are added
    /// separately by the caller.
    pub fn make_url(&self, host: &str, port: Option<u16>, database: &str) -> Result<String> {
        if database.is_empty() {
            return Err(ResultsError::config("Database name is required"));
        }

        let port = port.or(self.default_port());
        let url = match (self, port) {
            (Self::Sqlite, _) if database == ":memory:" => "sqlite::memory:".to_string(),
            (Self::Sqlite, _) => format!("sqlite://{database}?mode=rwc"),
            (Self::Oracle, Some(port)) => format!("oracle://{host}:{port}/{database}"),
            (Self::Postgres, Some(port)) => format!("postgres://{host}:{port}/{database}"),
            (Self::Mysql, Some(port)) => format!("mysql://{host}:{port}/{database}"),
            (vendor, None) => {
                return Err(ResultsError::config(format!("{vendor} requires a port")));
            }
        };
        Ok(url)
    }

    /// Returns the statement that reports the server version as text.
    pub fn version_query(&self) -> &'static str {
        match self {
            Self::Oracle => "SELECT banner FROM v$version WHERE ROWNUM = 1",
            Self::Postgres => "SHOW server_version",
            Self::Mysql => "SELECT VERSION()",
            Self::Sqlite => "SELECT sqlite_version()",
        }
    }

    /// Returns true if URLs for this vendor carry host and credentials.
    pub fn is_networked(&self) -> bool {
        self.default_port().is_some()
    }
}

impl fmt::Display for Vendor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Vendor {
    type Err = ResultsError;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        Self::parse(s).ok_or_else(|| ResultsError::unsupported_vendor(s.to_string()))
    }
}
