pub mod config;

pub mod shared {
    pub mod constants;
    pub mod encoding;
    pub mod fourcc;
    pub mod frame;
    pub mod timestamp;
    pub mod video_metadata;
}

pub mod conversion {
    pub mod domain {
        pub mod colormap;
        pub mod frame_converter;
    }
    pub mod infrastructure {
        pub mod display_converter;
    }
}

pub mod recording {
    pub mod domain {
        pub mod command;
        pub mod output_file_namer;
        pub mod rate_gate;
        pub mod recording_state;
        pub mod writer_lifecycle;
    }
}

pub mod transport {
    pub mod domain {
        pub mod transport;
    }
    pub mod infrastructure {
        pub mod channel_dispatcher;
    }
}

pub mod video {
    pub mod domain {
        pub mod frame_source;
        pub mod video_writer;
    }
    pub mod infrastructure {
        pub mod ffmpeg_source;
        pub mod ffmpeg_writer;
    }
}

pub mod pipeline {
    pub mod ingest_frame_use_case;
    pub mod record_error;
    pub mod recorder_service;
    pub mod recording_controller;
    pub mod recording_session;
    pub mod recording_stats;
}
