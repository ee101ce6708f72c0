mod differential;
mod scenarios;
