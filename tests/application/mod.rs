mod rate_limiter_test;
