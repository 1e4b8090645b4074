pub mod gradio_predict_response;
