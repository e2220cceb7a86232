pub(crate) mod gemini_client;
pub(crate) mod prompts;
pub(crate) mod response_handler;
