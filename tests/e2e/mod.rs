mod helpers;
mod test_pipeline;
