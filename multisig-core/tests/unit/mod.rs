mod backoff_proptest;
mod coordination;
mod credentials;
mod routes;
