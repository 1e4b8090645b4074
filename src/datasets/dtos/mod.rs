pub mod generate_dataset_dto;
