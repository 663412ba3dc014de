pub mod droppa_server;
