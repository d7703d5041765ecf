pub mod fakes;
pub mod mock_inference_server;
