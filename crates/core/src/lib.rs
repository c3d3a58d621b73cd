pub mod detection {
    pub mod domain {
        pub mod binarizer;
        pub mod blob_detector;
        pub mod component_labeler;
        pub mod detection_formatter;
    }
    pub mod infrastructure;
}

pub mod pipeline {
    pub mod detect_frames_use_case;
    pub mod detection_config;
    pub mod detector_pipeline;
    pub mod frame_executor;
    pub mod pipeline_logger;

    pub mod infrastructure {
        pub mod threaded_frame_executor;
    }
}

pub mod shared {
    pub mod config_error;
    pub mod constants;
    pub mod detection_record;
    pub mod diagnostic;
    pub mod frame;
    pub mod mask;
    pub mod source_metadata;
}

pub mod video {
    pub mod domain {
        pub mod detection_sink;
        pub mod frame_source;
    }
    pub mod infrastructure {
        pub mod image_sequence_source;
        pub mod json_lines_sink;
        pub mod overlay_image_sink;
    }
}
