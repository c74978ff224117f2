mod recurring_service_tests;
