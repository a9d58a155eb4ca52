mod content_type;
mod retry;
mod transfer;
