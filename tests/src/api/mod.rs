mod builders;
mod jobs;
mod listing;
mod source_detail;
