pub mod mock_model_client;
