pub mod audiobook;
