pub mod department_fund;
pub mod fund_request;
pub mod ledger;
pub mod report;
pub mod session;
pub mod summary;
pub mod user;
