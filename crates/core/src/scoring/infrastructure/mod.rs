pub mod bag_of_words_embedder;
pub mod language_tool_checker;
pub mod onnx_sentence_embedder;
