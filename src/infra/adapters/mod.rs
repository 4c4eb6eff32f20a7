pub mod case_file;
pub mod psql;

pub use case_file::TomlCaseStore;
pub use psql::PsqlExecutor;
