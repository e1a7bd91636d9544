mod join_request_tests;
