pub const EMBEDDING_MODEL_NAME: &str = "all-MiniLM-L6-v2.onnx";
pub const EMBEDDING_MODEL_URL: &str =
    "https://huggingface.co/sentence-transformers/all-MiniLM-L6-v2/resolve/main/onnx/model.onnx";

pub const TOKENIZER_NAME: &str = "all-MiniLM-L6-v2.tokenizer.json";
pub const TOKENIZER_URL: &str =
    "https://huggingface.co/sentence-transformers/all-MiniLM-L6-v2/resolve/main/tokenizer.json";

/// Public LanguageTool server. Self-hosted instances expose the same API.
pub const LANGUAGE_TOOL_URL: &str = "https://api.languagetool.org";
pub const LANGUAGE_TOOL_LANGUAGE: &str = "en-US";

/// Speech duration assumed when the caller has no measurement.
pub const DEFAULT_DURATION_MINUTES: f64 = 1.5;

pub const DEFAULT_REPORT_FILENAME: &str = "transcript_score.json";

pub const SAMPLE_TRANSCRIPT: &str = "Hello everyone, myself Muskan, studying in class 8th B section from Christ Public School. \
I am 13 years old. I live with my family. There are 3 people in my family, me, my mother and my father. \
One special thing about my family is that they are very kind hearted to everyone and soft spoken. One thing I really enjoy is play, playing cricket and taking wickets. \
A fun fact about me is that I see in mirror and talk by myself. One thing people don't know about me is that I once stole a toy from one of my cousin. \
My favorite subject is science because it is very interesting. Through science I can explore the whole world and make the discoveries and improve the lives of others. \
Thank you for listening.";
