mod document_url_test;
