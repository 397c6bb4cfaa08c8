pub mod shared {
    pub mod constants;
    pub mod model_resolver;
    pub mod text;
}

pub mod rubric {
    pub mod domain {
        pub mod content_element;
        pub mod rubric;
    }
    pub mod infrastructure {
        pub mod rubric_file;
    }
}

pub mod scoring {
    pub mod domain {
        pub mod clarity_scorer;
        pub mod content_structure_scorer;
        pub mod criterion_result;
        pub mod criterion_scorer;
        pub mod engagement_scorer;
        pub mod grammar_checker;
        pub mod language_grammar_scorer;
        pub mod measurement;
        pub mod salutation_scorer;
        pub mod score_report;
        pub mod semantic_similarity;
        pub mod speech_rate_scorer;
        pub mod text_embedder;
        pub mod transcript;
    }
    pub mod infrastructure;
}

pub mod pipeline {
    pub mod infrastructure {
        pub mod threaded_scoring_executor;
    }
    pub mod scoring_engine;
    pub mod scoring_executor;
    pub mod scoring_logger;
}
