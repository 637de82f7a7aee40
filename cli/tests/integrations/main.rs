mod query;
mod run;
mod server;
