mod local_code_store_tests;
