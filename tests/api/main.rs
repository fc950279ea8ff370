
mod setup;
