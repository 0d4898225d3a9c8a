//! Vendor constructors, one file per database. Derived vendors (mariadb,
//! cockroachdb) start from their ancestor's constructor and override.

mod cockroachdb;
mod h2;
mod mariadb;
mod mysql;
mod oracle;
mod postgresql;
mod sqlite;
mod sqlserver;
